//! Common error types for Refrain

use thiserror::Error;

/// Common result type for Refrain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Refrain services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure taxonomy for outbound calls to hosted endpoints.
///
/// Every catalog, name-generation, and cover-generation call resolves to
/// exactly one of these. There is no partial-success variant: a response
/// that does not fully parse is `Malformed`, never a trimmed result.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or non-2xx status from the upstream endpoint.
    /// Carries the HTTP status when one was received so the UI can show it.
    #[error("Transport error{}: {message}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Response body failed JSON decoding or the required schema is absent.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Transport failure with no HTTP status (connect error, timeout).
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Transport failure from a non-2xx status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        FetchError::Transport {
            status: Some(status),
            message: message.into(),
        }
    }
}
