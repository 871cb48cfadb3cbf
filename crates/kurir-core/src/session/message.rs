//! Transcript message types.

use serde::{Deserialize, Serialize};

/// Identifies which side of the conversation authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Message produced by the support bot.
    Bot,
}

/// A single message in the visible transcript.
///
/// Messages are immutable once created and only ever appended; the
/// transcript never shrinks for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub sender: Sender,
    /// Raw message text, before display formatting.
    pub text: String,
    /// Timestamp when the message was created (RFC 3339 format).
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn now(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
