//! Client error types

use thiserror::Error;

/// Client error type
///
/// Nothing here is fatal: every failure is scoped to a single interaction
/// and recoverable by retry or navigation. Service layers log and re-throw;
/// the caller owns user-visible messaging.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never reached the server (connect failure, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Server replied with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Client-side form/argument guard failure, never sent to the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Some per-item calls of a bulk operation failed
    #[error("Partial failure: {} item(s) failed", .failed.len())]
    PartialFailure { failed: Vec<String> },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify a reqwest transport error.
    ///
    /// Status-bearing errors become `Server`; everything else (connect,
    /// timeout, body read) is a `Network` failure that never reached a
    /// well-formed response.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ClientError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ClientError::Network(err.to_string()),
        }
    }

    /// Whether a single automatic retry is worthwhile
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
