//! Splitting long messages to fit Discord's per-message limit.

/// Maximum characters in one Discord message.
pub const DISCORD_CHAR_LIMIT: usize = 2000;

/// Characters kept free for a `" (Part i/n)"` label.
pub const PART_LABEL_RESERVE: usize = 20;

/// Split `text` into chunks of at most `limit` characters.
///
/// Lines are packed greedily so chunks break on line boundaries where
/// possible. A line longer than `limit` is cut after the last space in the
/// second half of the window, or at exactly `limit` characters if there is
/// none. Nothing is trimmed, so concatenating the chunks gives back `text`.
/// Empty input yields no chunks.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);

    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if !current.is_empty() && current_len + line_len > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(line);
        current_len += line_len;

        while current_len > limit {
            let cut = long_line_cut(&current, limit);
            let rest = current.split_off(cut);
            chunks.push(std::mem::replace(&mut current, rest));
            current_len = current.chars().count();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Append `" (Part i/n)"` to each chunk when there is more than one.
///
/// Chunks must have been split with [`PART_LABEL_RESERVE`] characters to spare.
pub fn label_parts(chunks: Vec<String>) -> Vec<String> {
    let total = chunks.len();
    if total < 2 {
        return chunks;
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| format!("{} (Part {}/{})", chunk, i + 1, total))
        .collect()
}

/// Byte offset at which to cut a string longer than `limit` characters.
fn long_line_cut(text: &str, limit: usize) -> usize {
    let mut hard_cut = text.len();
    let mut last_space = None;

    for (position, (offset, ch)) in text.char_indices().enumerate() {
        if position == limit {
            hard_cut = offset;
            break;
        }
        if ch == ' ' && position >= limit / 2 {
            last_space = Some(offset + ch.len_utf8());
        }
    }

    last_space.unwrap_or(hard_cut)
}
