//! Discord delivery: message splitting and webhook posting.

pub mod split;
pub mod webhook;

pub use split::{label_parts, split_message, DISCORD_CHAR_LIMIT, PART_LABEL_RESERVE};
pub use webhook::DiscordWebhook;
