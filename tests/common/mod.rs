//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use git2::{Oid, Repository, Signature, Time};

use commitcast::notify::{FailureReport, Notifier};
use commitcast::{Config, Frequency, GeminiSettings, NotifyError};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a commit by "Test User" with the current time.
    pub fn commit(&self, message: &str) -> Oid {
        self.commit_by("Test User", message)
    }

    /// Create a commit by `author` with the current time.
    pub fn commit_by(&self, author: &str, message: &str) -> Oid {
        let sig = Signature::now(author, "test@example.com").expect("Failed to create signature");
        self.commit_with(&sig, message)
    }

    /// Create a commit by `author` dated `when`.
    pub fn commit_at(&self, author: &str, message: &str, when: DateTime<Utc>) -> Oid {
        let sig = Signature::new(author, "test@example.com", &Time::new(when.timestamp(), 0))
            .expect("Failed to create signature");
        self.commit_with(&sig, message)
    }

    /// Write a README.md into the working tree (not committed).
    pub fn write_readme(&self, content: &str) {
        std::fs::write(self.path().join("README.md"), content).expect("Failed to write README");
    }

    fn commit_with(&self, sig: &Signature<'_>, message: &str) -> Oid {
        // Create or update a file to have something to commit
        let file_path = self.dir.path().join("test.txt");
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        std::fs::write(&file_path, content).expect("Failed to write test file");

        // Add the file to the index
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), sig, sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }
}

/// A config pointing at `repo_path` with test-friendly timings.
pub fn test_config(repo_path: PathBuf, webhook_url: Option<String>, gemini_base_url: String) -> Config {
    Config {
        repo_path,
        git_ref: "HEAD".to_string(),
        webhook_url,
        gemini: GeminiSettings {
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: gemini_base_url,
        },
        frequency: Frequency::Weekly,
        send_empty_summary: false,
        email: None,
        http_timeout: Duration::from_secs(5),
        chunk_delay: Duration::ZERO,
        part_labels: false,
        dry_run: false,
    }
}

/// Notifier that records every report it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub reports: Arc<Mutex<Vec<FailureReport>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, report: &FailureReport) -> Result<(), NotifyError> {
        self.reports.lock().unwrap().push(report.clone());
        if self.fail {
            let source = "not an address"
                .parse::<lettre::message::Mailbox>()
                .unwrap_err();
            return Err(NotifyError::InvalidAddress {
                address: "not an address".to_string(),
                source,
            });
        }
        Ok(())
    }
}
