//! Posting message chunks to a Discord webhook.

use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use crate::error::DiscordError;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    chunk_delay: Duration,
    timeout_secs: u64,
}

impl DiscordWebhook {
    /// Create a webhook sender.
    ///
    /// `timeout` applies to each POST; `chunk_delay` is the pause between
    /// consecutive chunks of one message.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        chunk_delay: Duration,
    ) -> Result<Self, DiscordError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DiscordError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
            chunk_delay,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Post chunks one at a time, in order.
    ///
    /// Stops at the first failure. Chunks posted before it stay posted;
    /// the error reports how many went out.
    pub async fn send_chunks(&self, chunks: &[String]) -> Result<usize, DiscordError> {
        let total = chunks.len();

        for (i, chunk) in chunks.iter().enumerate() {
            let part = i + 1;
            if i > 0 && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }

            self.post(chunk, part, total).await.inspect_err(|e| {
                error!("{}", e);
            })?;

            info!("Sent part {}/{} to Discord", part, total);
        }

        Ok(total)
    }

    async fn post(&self, content: &str, part: usize, total: usize) -> Result<(), DiscordError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content })
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    DiscordError::Timeout {
                        part,
                        total,
                        secs: self.timeout_secs,
                    }
                } else {
                    DiscordError::Request {
                        part,
                        total,
                        source,
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Status {
                part,
                total,
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_no_chunks_posts_nothing() {
        let webhook = DiscordWebhook::new(
            "http://127.0.0.1:9/unused",
            Duration::from_secs(1),
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(webhook.send_chunks(&[]).await.unwrap(), 0);
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(WebhookPayload { content: "hi" }).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hi"}));
    }
}
