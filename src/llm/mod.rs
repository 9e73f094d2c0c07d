//! LLM client and prompt construction.

pub mod gemini;
pub mod prompt;

pub use gemini::{CompletionClient, GeminiClient};
pub use prompt::{build_prompt, Prompt};
