//! Error types for the network-facing clients.
//!
//! The polling loops never propagate these; they log the failure class and
//! wait for the next tick.

use thiserror::Error;

/// Failure fetching data from the game platform.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether the request hit the per-call timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request(e) if e.is_timeout())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}

/// Failure delivering a message to one recipient.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("messaging API rejected the call ({status}): {description}")]
    Rejected {
        status: reqwest::StatusCode,
        description: String,
    },
}
