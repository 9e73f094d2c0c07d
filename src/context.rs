//! Project context read from the repository README.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

/// Maximum number of characters read from the README.
pub const MAX_CONTEXT_CHARS: usize = 1000;

/// A UTF-8 character is at most four bytes.
const MAX_README_BYTES: u64 = 4 * MAX_CONTEXT_CHARS as u64;

const README_NAMES: [&str; 3] = ["README.md", "README", "readme.md"];

/// Read the start of the repository README for prompt context.
///
/// Returns `None` when no README exists, it is empty, or it cannot be read.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_project_context(repo_path: &Path) -> Option<String> {
    let readme = README_NAMES
        .iter()
        .map(|name| repo_path.join(name))
        .find(|path| path.is_file());

    let Some(readme) = readme else {
        debug!("No README found in {}", repo_path.display());
        return None;
    };

    let bytes = match read_prefix(&readme) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Error reading {}: {}", readme.display(), e);
            return None;
        }
    };

    let content: String = String::from_utf8_lossy(&bytes)
        .chars()
        .take(MAX_CONTEXT_CHARS)
        .collect();

    if content.trim().is_empty() {
        None
    } else {
        Some(content)
    }
}

/// Read at most enough bytes to hold `MAX_CONTEXT_CHARS` UTF-8 characters.
fn read_prefix(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(MAX_README_BYTES as usize);
    File::open(path)?
        .take(MAX_README_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}
