//! Client error types.

use thiserror::Error;

/// Errors returned by [`TicketClient`](crate::TicketClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server base URL could not be used to build request URLs.
    #[error("Invalid server URL {url}: {reason}")]
    InvalidUrl {
        /// The URL as given
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("Server returned {status} [{code}]: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Machine-readable error code from the response body
        code: String,
        /// Human-readable message from the response body
        message: String,
    },
}

impl ClientError {
    /// HTTP status of an [`Api`](Self::Api) error
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::InvalidUrl { .. } => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
