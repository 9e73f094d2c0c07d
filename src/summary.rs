//! Commit summarization with a deterministic fallback.
//!
//! The summarizer never fails: if the LLM call errors or returns nothing
//! usable, the commits are rendered as a plain bulleted list instead.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::git::Commit;
use crate::llm::{build_prompt, CompletionClient};
use crate::runlog::RunLog;
use crate::window::Frequency;

/// Text used when there is nothing to summarize.
pub const NO_COMMITS_MESSAGE: &str = "No new commits found in the specified period.";

/// Where the summary text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    Ai,
    Fallback,
}

impl fmt::Display for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarySource::Ai => f.write_str("ai"),
            SummarySource::Fallback => f.write_str("fallback"),
        }
    }
}

/// The summary produced for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub text: String,
    pub source: SummarySource,
}

impl SummaryResult {
    fn fallback(text: String) -> Self {
        Self {
            text,
            source: SummarySource::Fallback,
        }
    }
}

pub struct Summarizer<'a, C: CompletionClient + ?Sized> {
    client: &'a C,
    run_log: &'a RunLog,
}

impl<'a, C: CompletionClient + ?Sized> Summarizer<'a, C> {
    pub fn new(client: &'a C, run_log: &'a RunLog) -> Self {
        Self { client, run_log }
    }

    /// Summarize `commits`, falling back to a plain list on any LLM failure.
    pub async fn summarize(
        &self,
        commits: &[Commit],
        context: Option<&str>,
        frequency: Frequency,
    ) -> SummaryResult {
        if commits.is_empty() {
            self.run_log
                .section("AI Summarization Skipped", "No new commits found.");
            return SummaryResult::fallback(NO_COMMITS_MESSAGE.to_string());
        }

        let prompt = build_prompt(commits, context, frequency);
        self.run_log.section("System Prompt Sent to AI", &prompt.system);
        self.run_log.section("User Prompt Sent to AI", &prompt.user);

        info!("Sending {} commits to the LLM for summarization", commits.len());

        match self.client.complete(&prompt).await {
            Ok(text) => {
                info!("Received summary from the LLM");
                self.run_log.section("AI Summary", &text);
                SummaryResult {
                    text,
                    source: SummarySource::Ai,
                }
            }
            Err(e) => {
                warn!("LLM summarization failed, falling back to a commit list: {}", e);
                self.run_log.section("Error: AI Summarization Failed", &e);
                SummaryResult::fallback(format_fallback(commits, Utc::now()))
            }
        }
    }
}

/// Render commits as a plain bulleted list of `author: message`.
///
/// Multi-line messages keep their body, indented under the bullet.
pub fn format_fallback(commits: &[Commit], today: DateTime<Utc>) -> String {
    if commits.is_empty() {
        return NO_COMMITS_MESSAGE.to_string();
    }

    let mut summary = format!(
        "**Commit Summary ({})**\n\nFound {} commits:\n",
        today.format("%Y-%m-%d"),
        commits.len()
    );

    for commit in commits {
        // Continuation lines are indented so each commit stays one bullet.
        let message = commit.message.trim().replace('\n', "\n  ");
        summary.push_str(&format!("- {}: {}\n", commit.author, message));
    }

    summary
}
