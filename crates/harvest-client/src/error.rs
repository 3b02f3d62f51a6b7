//! Error types for the API client

use thiserror::Error;

/// Errors that can occur while talking to the document API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Network-level failure (connect, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A successful response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ClientError::Config(e.to_string())
        } else if e.is_timeout() {
            ClientError::Transport(format!("request timed out: {}", e))
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}
