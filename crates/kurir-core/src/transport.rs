//! Backend request/response seam.
//!
//! The session controller talks to the chat backend exclusively through the
//! [`Transport`] trait. Concrete bindings (HTTP, test doubles) live outside
//! this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::Rating;

/// Status value the backend uses for operations that went through.
pub const STATUS_SUCCESS: &str = "success";

/// Reply to a chat message exchange.
///
/// A reply with any status other than [`STATUS_SUCCESS`] is a
/// server-reported failure: the backend answered, but declined the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReply {
    pub status: String,
    /// Server-issued conversation identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// The bot's answer text.
    #[serde(default)]
    pub response: String,
    /// Human-readable failure detail, present on non-success replies.
    #[serde(default)]
    pub error: Option<String>,
    /// Replacement bot text to display when the exchange failed.
    #[serde(default)]
    pub fallback_response: Option<String>,
}

impl MessageReply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Reply to a rating submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingReply {
    pub status: String,
    /// Acknowledgement text to append to the transcript.
    #[serde(default)]
    pub response: String,
}

impl RatingReply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// One stored transcript entry returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: String,
    pub is_user: bool,
    /// RFC 3339 timestamp recorded by the backend.
    pub timestamp: String,
}

/// Reply to a history lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryReply {
    pub status: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryReply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Errors for requests that never produced a usable reply.
///
/// These are the connectivity-level failures; a backend that answered with a
/// non-success status is reported through the reply types above instead.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportError {
    /// The request could not be delivered.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The request was delivered but no reply arrived in time.
    #[error("Request timed out")]
    Timeout,

    /// A reply arrived but its body could not be understood.
    #[error("Unreadable reply: {0}")]
    InvalidBody(String),
}

/// Request/response mechanism to the chat backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers a user message and returns the backend's reply.
    async fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> std::result::Result<MessageReply, TransportError>;

    /// Submits a star rating for the session.
    async fn submit_rating(
        &self,
        rating: &Rating,
    ) -> std::result::Result<RatingReply, TransportError>;

    /// Fetches the stored transcript of a previous session.
    async fn fetch_history(
        &self,
        session_id: &str,
    ) -> std::result::Result<HistoryReply, TransportError>;
}
