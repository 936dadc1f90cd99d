// ABOUTME: Chat message types — the sender tag and the immutable message record.
// ABOUTME: Serialized as {"sender":"user"|"bot","text":...} in the persisted history.

use serde::{Deserialize, Serialize};

/// Reply shown whenever a request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry! there is some technical issue, Please try again";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the chat history. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    /// The bot message appended when a request fails.
    pub fn fallback() -> Self {
        Self::bot(FALLBACK_REPLY)
    }
}
