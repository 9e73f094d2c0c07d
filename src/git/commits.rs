//! Commit fetching within a time window.

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::{DiffStatsFormat, Repository, Sort};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::GitError;
use crate::window::TimeWindow;

/// A commit read from the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    pub hash: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub message: String,
    /// Short diff statistics against the first parent, when available.
    pub diff_summary: Option<String>,
}

impl Commit {
    /// Create a Commit from a git2 Commit.
    ///
    /// Returns `None` when the author timestamp is out of range.
    pub fn from_git2_commit(repo: &Repository, commit: &git2::Commit) -> Option<Self> {
        let hash = commit.id().to_string();
        let author = commit.author();
        let date = DateTime::from_timestamp(author.when().seconds(), 0)?;

        let diff_summary = match diff_summary(repo, commit) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Could not get diff for commit {}: {}", hash, e);
                None
            }
        };

        Some(Self {
            hash,
            author: author.name().unwrap_or("unknown").to_string(),
            date,
            message: commit.message().unwrap_or("").to_string(),
            diff_summary,
        })
    }

    /// The abbreviated 7-character hash.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Open the repository at `path` without searching parent directories.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    Repository::open(path).map_err(|source| GitError::OpenRepository {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetch commits reachable from `reference` whose author time falls in `window`.
///
/// Commits are returned newest first. A repository without any commits
/// yields an empty list.
pub fn fetch_commits_in_window(
    repo: &Repository,
    reference: &str,
    window: &TimeWindow,
) -> Result<Vec<Commit>, GitError> {
    if repo.is_empty().map_err(GitError::RevwalkError)? {
        debug!("Repository has no commits yet");
        return Ok(Vec::new());
    }

    let tip = repo
        .revparse_single(reference)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))?;

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(GitError::RevwalkError)?;
    revwalk.push(tip.id()).map_err(GitError::RevwalkError)?;

    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;

        let authored = match DateTime::from_timestamp(commit.author().when().seconds(), 0) {
            Some(at) => at,
            None => {
                warn!("Skipping commit {} with invalid author timestamp", oid);
                continue;
            }
        };

        if !window.contains(authored) {
            continue;
        }

        if let Some(parsed) = Commit::from_git2_commit(repo, &commit) {
            commits.push(parsed);
        }
    }

    Ok(commits)
}

/// Shortstat line for a commit, diffed against its first parent or the empty tree.
fn diff_summary(repo: &Repository, commit: &git2::Commit) -> Result<Option<String>, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;
    if stats.files_changed() == 0 {
        return Ok(None);
    }

    let buf = stats.to_buf(DiffStatsFormat::SHORT, 80)?;
    Ok(buf
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
