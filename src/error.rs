//! Error types for commitcast modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from validating settings before a run starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Email notification is enabled but these settings are missing: {}", .0.join(", "))]
    IncompleteEmailSettings(Vec<&'static str>),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {}: {source}", path.display())]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),
}

impl GitError {
    /// True when the path itself is not a usable repository, as opposed to
    /// a failure while reading history from one.
    pub fn is_repository_error(&self) -> bool {
        matches!(self, GitError::OpenRepository { .. })
    }
}

/// Errors from the Gemini chat-completions API.
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Gemini request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Gemini returned no summary content")]
    EmptyResponse,
}

/// Errors from posting to a Discord webhook.
#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("Failed to send part {part}/{total} to Discord: {source}")]
    Request {
        part: usize,
        total: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("Sending part {part}/{total} to Discord timed out after {secs} seconds")]
    Timeout { part: usize, total: usize, secs: u64 },

    #[error("Discord rejected part {part}/{total} with {status}: {body}")]
    Status {
        part: usize,
        total: usize,
        status: u16,
        body: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DiscordError {
    /// Number of chunks that were posted before the failure.
    pub fn delivered(&self) -> usize {
        match self {
            DiscordError::Request { part, .. }
            | DiscordError::Timeout { part, .. }
            | DiscordError::Status { part, .. } => part - 1,
            DiscordError::Client(_) => 0,
        }
    }
}

/// Errors from sending the failure notification email.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid email address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Failed to build email: {0}")]
    BuildMessage(#[source] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[source] lettre::transport::smtp::Error),
}

/// Errors that end a run unsuccessfully.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Delivery(#[from] DiscordError),
}

impl RunError {
    /// Short label used in notification subjects and run log headers.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Config(_) => "ConfigurationError",
            RunError::Git(e) if e.is_repository_error() => "RepositoryError",
            RunError::Git(_) => "GitOperationError",
            RunError::Delivery(_) => "DeliveryError",
        }
    }
}
