//! Network-level failure details.

use std::error::Error as StdError;
use thiserror::Error;

/// Transport failures after normalization.
///
/// Carries no `reqwest` types, so the public error surface does not move when
/// the HTTP client does. `Timeout` and `ConnectionFailed` are retryable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection could not be established or was reset.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Anything else the transport reported, source preserved.
    #[error("Transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl NetworkError {
    /// Whether the failure is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::ConnectionFailed(_))
    }
}
