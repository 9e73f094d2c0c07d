//! Failure notification by email.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::EmailSettings;
use crate::error::NotifyError;

/// What went wrong in a failed run.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub subject: String,
    pub details: String,
    pub occurred_at: DateTime<Utc>,
}

impl FailureReport {
    /// Plain-text email body.
    pub fn body(&self) -> String {
        format!(
            "The commit summary run encountered a critical error and could not complete.\n\n\
             Time: {}\n\nError Details:\n{}\n",
            self.occurred_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.details
        )
    }
}

/// Delivers failure reports to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &FailureReport) -> Result<(), NotifyError>;
}

/// Sends failure reports over SMTP with STARTTLS.
pub struct EmailNotifier {
    settings: EmailSettings,
    timeout: Duration,
}

impl EmailNotifier {
    pub fn new(settings: EmailSettings, timeout: Duration) -> Self {
        Self { settings, timeout }
    }

    /// Notifier built straight from the CLI, for failures that happen
    /// before a [`Config`](crate::config::Config) exists.
    ///
    /// `None` when email is disabled or its own settings are incomplete.
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        let timeout = Duration::from_secs(cli.http_timeout_secs.max(1));
        match EmailSettings::from_cli(cli) {
            Ok(settings) => settings.map(|settings| Self::new(settings, timeout)),
            Err(e) => {
                warn!("Cannot send failure email: {}", e);
                None
            }
        }
    }

    fn build_message(&self, report: &FailureReport) -> Result<Message, NotifyError> {
        Message::builder()
            .from(parse_mailbox(&self.settings.sender)?)
            .to(parse_mailbox(&self.settings.receiver)?)
            .subject(format!("[commitcast failure] {}", report.subject))
            .header(ContentType::TEXT_PLAIN)
            .body(report.body())
            .map_err(NotifyError::BuildMessage)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, report: &FailureReport) -> Result<(), NotifyError> {
        let message = self.build_message(report)?;

        info!(
            "Sending failure email to {} via {}:{}",
            self.settings.receiver, self.settings.server, self.settings.port
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)
            .map_err(NotifyError::Smtp)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.user.clone(),
                self.settings.password.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        mailer.send(message).await.map_err(NotifyError::Smtp)?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}
