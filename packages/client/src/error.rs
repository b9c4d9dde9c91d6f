//! Error types for the Undoubt client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The room does not exist (or no longer exists)
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// The host closed the room
    #[error("Room '{0}' was closed by the host")]
    RoomClosed(String),

    /// WebSocket connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether reconnecting could help
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}
