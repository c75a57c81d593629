//! Error types for the reader

use thiserror::Error;

/// Errors raised by the reader core and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// User input that cannot be applied (bad numbers, unknown names)
    #[error("{0}")]
    InvalidInput(String),

    /// Upstream API answered with a non-success status
    #[error("Upstream API error: HTTP {status}")]
    Upstream { status: u16 },

    /// Request could not be completed
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response or stored data was not the JSON we expected
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The audio resource refused to play
    #[error("Playback error: {0}")]
    Playback(String),

    /// Local storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Player bridge transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}

/// Coarse grouping used when turning an error into a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Upstream,
    Playback,
    Local,
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidInput(_) => ErrorCategory::Input,
            Error::Upstream { .. } | Error::Http(_) | Error::Decode(_) => ErrorCategory::Upstream,
            Error::Playback(_) => ErrorCategory::Playback,
            Error::Storage(_) | Error::WebSocket(_) => ErrorCategory::Local,
        }
    }

    /// Title shown on the notice raised for this error
    pub fn notice_title(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Invalid Input",
            ErrorCategory::Upstream => "Error",
            ErrorCategory::Playback => "Playback Error",
            ErrorCategory::Local => "Storage Error",
        }
    }
}

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, Error>;
