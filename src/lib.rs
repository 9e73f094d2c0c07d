//! commitcast - summarize recent git commits with an LLM and post them to Discord.
//!
//! # Overview
//!
//! commitcast collects the commits authored in the last day, week or month,
//! asks Gemini for an end-user friendly announcement (falling back to a plain
//! commit list if that fails), splits it to fit Discord's message limit and
//! posts it through a webhook. Fatal failures can be emailed to the operator.

pub mod cli;
pub mod config;
pub mod context;
pub mod discord;
pub mod error;
pub mod git;
pub mod llm;
pub mod notify;
pub mod pipeline;
pub mod runlog;
pub mod summary;
pub mod window;

// Re-export commonly used types
pub use config::{Config, EmailSettings, GeminiSettings};
pub use error::{ConfigError, DiscordError, GeminiError, GitError, NotifyError, RunError};
pub use git::Commit;
pub use pipeline::{run_and_report, Pipeline, RunOutcome};
pub use summary::{SummaryResult, SummarySource};
pub use window::{Frequency, TimeWindow};
