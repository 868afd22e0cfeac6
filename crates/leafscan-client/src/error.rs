//! Error types for the LeafScan client.

use thiserror::Error;

/// Errors that can occur when talking to a LeafScan backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The backend did not answer within the operation's budget.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Failed to establish a connection to the backend.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// Backend base URL could not be parsed.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Local file could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ClientError {
    /// Classify a reqwest failure; `timeout_secs` is the budget that applied.
    pub fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
