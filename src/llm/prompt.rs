//! Prompt construction for commit summaries.

use crate::git::Commit;
use crate::window::Frequency;

/// Characters of project context embedded in the system prompt.
pub const PROMPT_CONTEXT_CHARS: usize = 500;

/// A system/user prompt pair for one chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const STYLE_RULES: &str = "\
You write update announcements for a project's Discord server, in the voice of \
the lead developer talking to end users who are not programmers.

Rules:
1. Open with a single header line: one emoji, then `@everyone Update!`, then the same emoji. Only one header.
2. Be enthusiastic, direct and personal (\"I've been working on...\", \"You can now...\").
3. Group related changes under **bold headings** that name the new capability, each followed by a newline.
4. Explain what users can now do, not what code changed. Never mention function, file, component or internal code names.
5. Use plain hyphens; do not use the em-dash character.
6. Mention bug fixes individually only when users would have noticed them. Otherwise group them under **Smoother Experience**.
7. Keep the whole message well under 2000 characters.
";

/// Build the prompt for summarizing `commits`.
pub fn build_prompt(commits: &[Commit], context: Option<&str>, frequency: Frequency) -> Prompt {
    let context = context
        .map(collapse_whitespace)
        .filter(|c| !c.is_empty())
        .map(|c| c.chars().take(PROMPT_CONTEXT_CHARS).collect::<String>())
        .unwrap_or_else(|| "No project description available.".to_string());

    let system = format!("{}\n**Project Context:** {}\n", STYLE_RULES, context);

    let user = format!(
        "Generate the Discord update message based on these commits and changes from the last {}:\n\n{}",
        frequency.period(),
        format_commits(commits)
    );

    Prompt { system, user }
}

/// Format commits as the block embedded in the user prompt.
pub fn format_commits(commits: &[Commit]) -> String {
    commits
        .iter()
        .map(|commit| {
            format!(
                "- Commit: {} by {}\n  Message: {}\n  Changes: {}",
                commit.short_hash(),
                commit.author,
                commit.message.trim(),
                commit
                    .diff_summary
                    .as_deref()
                    .unwrap_or("No changes summary available.")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
