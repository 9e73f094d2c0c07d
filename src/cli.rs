//! Command-line interface. Every option can also come from the environment.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::Parser;

use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Summarize recent git commits with an LLM and post them to Discord.
#[derive(Parser, Debug, Clone)]
#[command(name = "commitcast")]
#[command(about = "Summarize recent git commits with an LLM and post them to Discord")]
#[command(version)]
pub struct Cli {
    /// Path to the local git repository
    #[arg(long = "repo", env = "GIT_REPO_PATH")]
    pub repo_path: Option<PathBuf>,

    /// Reference whose history is summarized
    #[arg(long = "ref", env = "GIT_REF", default_value = "HEAD")]
    pub git_ref: String,

    /// Discord webhook that receives the summary
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// API key for the Gemini API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Model used for summaries
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Base URL of the OpenAI-compatible Gemini endpoint
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Summary period: daily, weekly or monthly
    #[arg(long, env = "SUMMARY_FREQUENCY", default_value = "weekly")]
    pub frequency: String,

    /// Post a message even when no commits were found
    #[arg(long, env = "SEND_EMPTY_SUMMARY", value_parser = BoolishValueParser::new())]
    pub send_empty_summary: bool,

    /// Timeout in seconds for each HTTP and SMTP operation
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 60)]
    pub http_timeout_secs: u64,

    /// Pause in milliseconds between consecutive Discord messages
    #[arg(long, env = "DISCORD_CHUNK_DELAY_MS", default_value_t = 1500)]
    pub chunk_delay_ms: u64,

    /// Append "(Part i/n)" to messages split across several posts
    #[arg(long, env = "DISCORD_PART_LABELS", value_parser = BoolishValueParser::new())]
    pub part_labels: bool,

    /// Directory for per-run log files
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Print the summary instead of posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Email the operator when a run fails
    #[arg(long, env = "ENABLE_EMAIL_NOTIFICATION", value_parser = BoolishValueParser::new())]
    pub enable_email_notification: bool,

    #[arg(long, env = "SMTP_SERVER")]
    pub smtp_server: Option<String>,

    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    #[arg(long, env = "SMTP_USER")]
    pub smtp_user: Option<String>,

    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Sender address (defaults to SMTP_USER)
    #[arg(long, env = "EMAIL_SENDER")]
    pub email_sender: Option<String>,

    #[arg(long, env = "EMAIL_RECEIVER")]
    pub email_receiver: Option<String>,
}
