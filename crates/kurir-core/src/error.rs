//! Error types for the Kurir client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::TransportError;

/// A shared error type for the Kurir client crates.
///
/// Conversation failures are recovered inside the session controller and
/// never surface through this type; it covers the operations that can
/// legitimately fail outward (configuration loading, history restore).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum KurirError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", etc.
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Request that never produced a usable reply
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KurirError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<std::io::Error> for KurirError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KurirError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, KurirError>`.
pub type Result<T> = std::result::Result<T, KurirError>;
