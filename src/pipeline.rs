//! The summary run: fetch, summarize, split, send.
//!
//! ```text
//! START -> FETCH -> (empty? -> maybe skip) -> SUMMARIZE -> SPLIT -> SEND -> DONE
//!            any unrecovered error -> NOTIFY -> FAILED
//! ```

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::context::read_project_context;
use crate::discord::{label_parts, split_message, DiscordWebhook, DISCORD_CHAR_LIMIT, PART_LABEL_RESERVE};
use crate::error::{ConfigError, RunError};
use crate::git::{fetch_commits_in_window, open_repository};
use crate::llm::CompletionClient;
use crate::notify::{FailureReport, Notifier};
use crate::runlog::RunLog;
use crate::summary::{SummaryResult, Summarizer, SummarySource};
use crate::window::TimeWindow;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No commits in the window and empty summaries are not sent.
    NoCommits,
    /// Dry run: the summary was produced but not posted.
    DryRun(SummaryResult),
    /// The summary was posted in `chunks` messages.
    Delivered { source: SummarySource, chunks: usize },
}

pub struct Pipeline<'a, C: CompletionClient + ?Sized> {
    config: &'a Config,
    llm: &'a C,
    run_log: &'a RunLog,
}

impl<'a, C: CompletionClient + ?Sized> Pipeline<'a, C> {
    pub fn new(config: &'a Config, llm: &'a C, run_log: &'a RunLog) -> Self {
        Self {
            config,
            llm,
            run_log,
        }
    }

    /// Run once for the window ending at `now`.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunOutcome, RunError> {
        let config = self.config;

        // Fetch
        let window = TimeWindow::ending_at(config.frequency, now);
        self.run_log.json_section("Time Window", &window);
        info!(
            "Fetching commits since {} ({})",
            window.start.format("%Y-%m-%d %H:%M"),
            config.frequency
        );

        let repo = open_repository(&config.repo_path)?;
        let commits = fetch_commits_in_window(&repo, &config.git_ref, &window)?;
        self.run_log.json_section("Fetched Commits", &commits);
        info!("Found {} commits", commits.len());

        if commits.is_empty() && !config.send_empty_summary {
            info!("No commits in the window; nothing to send");
            self.run_log
                .section("Discord Sending Skipped", "No commits and SEND_EMPTY_SUMMARY is off.");
            return Ok(RunOutcome::NoCommits);
        }

        // Summarize
        let context = read_project_context(&config.repo_path);
        self.run_log.section(
            "README Context",
            context.as_deref().unwrap_or("README not found."),
        );

        let summary = Summarizer::new(self.llm, self.run_log)
            .summarize(&commits, context.as_deref(), config.frequency)
            .await;
        self.run_log.section(
            &format!("Final Summary (source: {})", summary.source),
            &summary.text,
        );

        if config.dry_run {
            return Ok(RunOutcome::DryRun(summary));
        }

        // Split
        let chunks = self.split(&summary.text);
        self.run_log.json_section(
            &format!("Message Splitting (Into {} Chunks)", chunks.len()),
            &chunks,
        );

        // Send
        let url = config
            .webhook_url
            .as_deref()
            .ok_or(ConfigError::Missing("DISCORD_WEBHOOK_URL"))?;
        let webhook = DiscordWebhook::new(url, config.http_timeout, config.chunk_delay)?;

        let sent = match webhook.send_chunks(&chunks).await {
            Ok(sent) => sent,
            Err(e) => {
                self.run_log.section(
                    "Discord Delivery Failed",
                    format!("{} ({} of {} parts delivered)", e, e.delivered(), chunks.len()),
                );
                return Err(e.into());
            }
        };

        self.run_log
            .section("Discord Delivery Finished", format!("{} parts sent", sent));

        Ok(RunOutcome::Delivered {
            source: summary.source,
            chunks: sent,
        })
    }

    fn split(&self, text: &str) -> Vec<String> {
        if self.config.part_labels {
            label_parts(split_message(text, DISCORD_CHAR_LIMIT - PART_LABEL_RESERVE))
        } else {
            split_message(text, DISCORD_CHAR_LIMIT)
        }
    }
}

/// Run once and report any failure through the notifier.
pub async fn run_and_report<C: CompletionClient + ?Sized>(
    config: &Config,
    llm: &C,
    notifier: Option<&dyn Notifier>,
    run_log: &RunLog,
    now: DateTime<Utc>,
) -> Result<RunOutcome, RunError> {
    match Pipeline::new(config, llm, run_log).run(now).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            let metadata = format!(
                "Repository: {}\nReference: {}\nFrequency: {}",
                config.repo_path.display(),
                config.git_ref,
                config.frequency
            );
            report_failure(&err, &metadata, notifier, run_log).await;
            Err(err)
        }
    }
}

/// Report a configuration that failed validation, before any run starts.
///
/// Returns the error the process should exit with.
pub async fn report_config_failure(
    cli: &Cli,
    err: ConfigError,
    notifier: Option<&dyn Notifier>,
    run_log: &RunLog,
) -> RunError {
    let err = RunError::from(err);
    let metadata = format!(
        "Configuration could not be loaded.\nRepository: {}\nFrequency: {}",
        cli.repo_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unset>".to_string()),
        cli.frequency
    );
    report_failure(&err, &metadata, notifier, run_log).await;
    err
}

/// Log a fatal error and send it to the notifier, if any.
///
/// Notification failures are logged and never returned.
pub async fn report_failure(
    err: &RunError,
    metadata: &str,
    notifier: Option<&dyn Notifier>,
    run_log: &RunLog,
) {
    let details = format!("Error Type: {}\n{}\n\n{}", err.kind(), metadata, error_chain(err));

    error!("Run failed: {}", err);
    run_log.section(&format!("CRITICAL FAILURE: {}", err.kind()), &details);

    let Some(notifier) = notifier else {
        info!("Email notifications are disabled. Skipping failure email.");
        return;
    };

    let report = FailureReport {
        subject: format!("Critical Error: {}", err.kind()),
        details,
        occurred_at: Utc::now(),
    };

    match notifier.notify(&report).await {
        Ok(()) => {
            info!("Failure email sent");
            run_log.section("Failure Email Sent", &report.subject);
        }
        Err(e) => {
            error!("Failed to send failure email: {}", e);
            run_log.section("Email Sending Error", &e);
        }
    }
}

/// The error message followed by each of its sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\nCaused by: {}", cause));
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitError;

    #[test]
    fn test_error_chain_includes_sources() {
        let err = RunError::Git(GitError::RevwalkError(git2::Error::from_str("object missing")));
        let chain = error_chain(&err);
        assert!(chain.starts_with("Failed to walk commit history: object missing"));
        assert!(chain.contains("Caused by: object missing"));
    }

    #[test]
    fn test_error_chain_states_config_error_once() {
        let err = RunError::from(ConfigError::InvalidValue {
            key: "SUMMARY_FREQUENCY",
            value: "yearly".to_string(),
            reason: "unknown".to_string(),
        });
        let chain = error_chain(&err);
        assert_eq!(
            chain,
            "Configuration error\nCaused by: Invalid value 'yearly' for SUMMARY_FREQUENCY: unknown"
        );
        assert_eq!(chain.matches("yearly").count(), 1);
    }
}
