//! Git operations using git2-rs.

pub mod commits;

pub use commits::{fetch_commits_in_window, open_repository, Commit};
