//! Validated run configuration.
//!
//! Settings are read once (flags or environment, via [`Cli`]) and turned into
//! a [`Config`] that is passed explicitly to each component.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::window::Frequency;

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// SMTP settings for failure notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailSettings {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender: String,
    pub receiver: String,
}

impl EmailSettings {
    /// Email settings from the CLI, `None` when notifications are disabled.
    ///
    /// When enabled, every SMTP setting must be present; the sender falls
    /// back to the SMTP user.
    pub fn from_cli(cli: &Cli) -> Result<Option<Self>, ConfigError> {
        if !cli.enable_email_notification {
            return Ok(None);
        }

        let server = non_empty(&cli.smtp_server);
        let user = non_empty(&cli.smtp_user);
        let password = non_empty(&cli.smtp_password);
        let sender = non_empty(&cli.email_sender).or_else(|| user.clone());
        let receiver = non_empty(&cli.email_receiver);

        let missing: Vec<&'static str> = [
            ("SMTP_SERVER", server.is_none()),
            ("SMTP_USER", user.is_none()),
            ("SMTP_PASSWORD", password.is_none()),
            ("EMAIL_SENDER", sender.is_none()),
            ("EMAIL_RECEIVER", receiver.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        match (server, user, password, sender, receiver) {
            (Some(server), Some(user), Some(password), Some(sender), Some(receiver)) => {
                Ok(Some(Self {
                    server,
                    port: cli.smtp_port,
                    user,
                    password,
                    sender,
                    receiver,
                }))
            }
            _ => Err(ConfigError::IncompleteEmailSettings(missing)),
        }
    }
}

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo_path: PathBuf,
    pub git_ref: String,
    /// `None` only in dry-run mode.
    pub webhook_url: Option<String>,
    pub gemini: GeminiSettings,
    pub frequency: Frequency,
    pub send_empty_summary: bool,
    pub email: Option<EmailSettings>,
    pub http_timeout: Duration,
    pub chunk_delay: Duration,
    pub part_labels: bool,
    pub dry_run: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let repo_path = cli
            .repo_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("GIT_REPO_PATH"))?;

        let api_key =
            non_empty(&cli.gemini_api_key).ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let webhook_url = match non_empty(&cli.webhook_url) {
            Some(url) => Some(validate_webhook_url(url)?),
            None if cli.dry_run => None,
            None => return Err(ConfigError::Missing("DISCORD_WEBHOOK_URL")),
        };

        let frequency = cli
            .frequency
            .parse::<Frequency>()
            .map_err(|reason| ConfigError::InvalidValue {
                key: "SUMMARY_FREQUENCY",
                value: cli.frequency.clone(),
                reason,
            })?;

        if cli.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }

        Ok(Self {
            repo_path,
            git_ref: cli.git_ref.clone(),
            webhook_url,
            gemini: GeminiSettings {
                api_key,
                model: cli.gemini_model.clone(),
                base_url: cli.gemini_base_url.clone(),
            },
            frequency,
            send_empty_summary: cli.send_empty_summary,
            email: EmailSettings::from_cli(cli)?,
            http_timeout: Duration::from_secs(cli.http_timeout_secs),
            chunk_delay: Duration::from_millis(cli.chunk_delay_ms),
            part_labels: cli.part_labels,
            dry_run: cli.dry_run,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn validate_webhook_url(url: String) -> Result<String, ConfigError> {
    match reqwest::Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "https" | "http") => Ok(url),
        Ok(parsed) => Err(ConfigError::InvalidValue {
            key: "DISCORD_WEBHOOK_URL",
            value: url.clone(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            key: "DISCORD_WEBHOOK_URL",
            value: url,
            reason: e.to_string(),
        }),
    }
}
