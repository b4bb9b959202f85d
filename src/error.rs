//! Error types for the One Touch client

use thiserror::Error;

/// Result type alias for One Touch operations
pub type Result<T> = std::result::Result<T, EpayError>;

/// Main error type for One Touch operations
#[derive(Error, Debug)]
pub enum EpayError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error, including non-success status codes
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl EpayError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status returned by the gateway, if this error carries one
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}
