//! Per-run Markdown log file.
//!
//! Each invocation appends `## <header> (<time>)` sections with fenced
//! content to `run_<timestamp>.md`. Failures to write are logged and ignored.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::warn;

pub struct RunLog {
    path: Option<PathBuf>,
}

impl RunLog {
    /// Create the log for a run started at `started_at` inside `dir`.
    ///
    /// The directory is created if needed. If that fails the log is disabled.
    pub fn create(dir: &Path, started_at: DateTime<Local>) -> Self {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Failed to create log directory '{}': {}", dir.display(), e);
            return Self::disabled();
        }

        let file_name = format!("run_{}.md", started_at.format("%Y%m%d_%H%M%S"));
        Self {
            path: Some(dir.join(file_name)),
        }
    }

    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append a section with plain text content.
    pub fn section(&self, header: &str, content: impl Display) {
        self.append(header, &format!("```\n{}\n```", content));
    }

    /// Append a section with JSON-serialized content.
    pub fn json_section<T: Serialize + ?Sized>(&self, header: &str, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.append(header, &format!("```json\n{}\n```", json)),
            Err(e) => self.section(header, format!("<unserializable: {}>", e)),
        }
    }

    fn append(&self, header: &str, body: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = format!(
            "## {} ({})\n\n{}\n\n",
            header,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            body
        );

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));

        if let Err(e) = result {
            warn!("Failed to write to log file '{}': {}", path.display(), e);
        }
    }
}
