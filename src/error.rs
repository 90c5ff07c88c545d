//! Error types for the projectlib library.

use thiserror::Error;

/// Main error type for project client operations.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Network request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Agent returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The shared message bus could not be acquired.
    #[error("Message bus unavailable: {0}")]
    BusUnavailable(String),

    /// Bus channel closed before a reply arrived.
    #[error("Bus channel closed")]
    ChannelClosed,
}

/// Result type alias for projectlib operations.
pub type Result<T> = std::result::Result<T, ProjectError>;
