//! Configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use commitcast::cli::Cli;
use commitcast::{Config, ConfigError, Frequency};
use serial_test::serial;

fn load() -> Result<Config, ConfigError> {
    let cli = Cli::try_parse_from(["commitcast"]).expect("Failed to parse CLI");
    Config::from_cli(&cli)
}

const BASE: [(&str, Option<&str>); 3] = [
    ("GIT_REPO_PATH", Some("/srv/project")),
    ("DISCORD_WEBHOOK_URL", Some("https://discord.com/api/webhooks/1/abc")),
    ("GEMINI_API_KEY", Some("env-key")),
];

fn vars(extra: &[(&'static str, Option<&'static str>)]) -> Vec<(&'static str, Option<&'static str>)> {
    let mut all = BASE.to_vec();
    all.extend_from_slice(extra);
    all
}

#[test]
#[serial]
fn test_required_values_from_env() {
    temp_env::with_vars(vars(&[]), || {
        let config = load().unwrap();
        assert_eq!(config.repo_path, PathBuf::from("/srv/project"));
        assert_eq!(config.gemini.api_key, "env-key");
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
    });
}

#[test]
#[serial]
fn test_frequency_and_flags_from_env() {
    temp_env::with_vars(
        vars(&[
            ("SUMMARY_FREQUENCY", Some("Monthly")),
            ("SEND_EMPTY_SUMMARY", Some("yes")),
            ("DISCORD_PART_LABELS", Some("1")),
            ("HTTP_TIMEOUT_SECS", Some("15")),
            ("DISCORD_CHUNK_DELAY_MS", Some("0")),
        ]),
        || {
            let config = load().unwrap();
            assert_eq!(config.frequency, Frequency::Monthly);
            assert!(config.send_empty_summary);
            assert!(config.part_labels);
            assert_eq!(config.http_timeout, Duration::from_secs(15));
            assert_eq!(config.chunk_delay, Duration::ZERO);
        },
    );
}

#[test]
#[serial]
fn test_false_flag_values_from_env() {
    temp_env::with_vars(
        vars(&[
            ("SEND_EMPTY_SUMMARY", Some("false")),
            ("ENABLE_EMAIL_NOTIFICATION", Some("off")),
        ]),
        || {
            let config = load().unwrap();
            assert!(!config.send_empty_summary);
            assert!(config.email.is_none());
        },
    );
}

#[test]
#[serial]
fn test_unknown_frequency_from_env() {
    temp_env::with_vars(vars(&[("SUMMARY_FREQUENCY", Some("hourly"))]), || {
        assert!(matches!(
            load(),
            Err(ConfigError::InvalidValue {
                key: "SUMMARY_FREQUENCY",
                ..
            })
        ));
    });
}

#[test]
#[serial]
fn test_email_settings_from_env() {
    temp_env::with_vars(
        vars(&[
            ("ENABLE_EMAIL_NOTIFICATION", Some("true")),
            ("SMTP_SERVER", Some("smtp.example.com")),
            ("SMTP_PORT", Some("2525")),
            ("SMTP_USER", Some("bot@example.com")),
            ("SMTP_PASSWORD", Some("hunter2")),
            ("EMAIL_RECEIVER", Some("ops@example.com")),
            ("EMAIL_SENDER", None),
        ]),
        || {
            let email = load().unwrap().email.expect("email settings");
            assert_eq!(email.server, "smtp.example.com");
            assert_eq!(email.port, 2525);
            assert_eq!(email.sender, "bot@example.com");
            assert_eq!(email.receiver, "ops@example.com");
        },
    );
}

#[test]
#[serial]
fn test_missing_repo_path() {
    temp_env::with_vars(
        [
            ("GIT_REPO_PATH", None),
            ("DISCORD_WEBHOOK_URL", Some("https://discord.com/api/webhooks/1/abc")),
            ("GEMINI_API_KEY", Some("env-key")),
        ],
        || {
            assert!(matches!(load(), Err(ConfigError::Missing("GIT_REPO_PATH"))));
        },
    );
}
