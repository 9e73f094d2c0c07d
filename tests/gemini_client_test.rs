//! Integration tests for the Gemini client against a mocked endpoint.

use std::time::Duration;

use commitcast::llm::{CompletionClient, GeminiClient, Prompt};
use commitcast::{GeminiError, GeminiSettings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, timeout: Duration) -> GeminiClient {
    let settings = GeminiSettings {
        api_key: "secret-key".to_string(),
        model: "gemini-2.0-flash".to_string(),
        base_url: format!("{}/", server.uri()),
    };
    GeminiClient::new(&settings, timeout).expect("Failed to build client")
}

fn prompt() -> Prompt {
    Prompt {
        system: "You write release notes.".to_string(),
        user: "Summarize these commits.".to_string(),
    }
}

#[tokio::test]
async fn test_request_shape_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer secret-key"))
        .and(body_partial_json(json!({
            "model": "gemini-2.0-flash",
            "n": 1,
            "max_tokens": 550,
            "messages": [
                {"role": "system", "content": "You write release notes."},
                {"role": "user", "content": "Summarize these commits."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "\n All good \n"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server, Duration::from_secs(5))
        .complete(&prompt())
        .await
        .unwrap();

    assert_eq!(reply, "All good");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .complete(&prompt())
        .await
        .unwrap_err();

    match err {
        GeminiError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .complete(&prompt())
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::EmptyResponse));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .complete(&prompt())
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::InvalidResponse(ref msg) if msg.contains("<html>oops</html>")));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(1))
        .complete(&prompt())
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::Timeout(1)));
}
