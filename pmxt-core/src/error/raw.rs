//! Un-normalized failures produced by transport and venue collaborators.

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error as ThisError;

use super::Error;
use super::convert::truncate_message;

/// Result type used by collaborators before error mapping.
pub type RawResult<T> = std::result::Result<T, RawError>;

/// A failure as observed at the venue boundary, before it has been classified.
///
/// Transports and venues return `RawError`; the runtime hands every one of them to
/// its [`ErrorMapper`](super::ErrorMapper) before a caller sees it.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum RawError {
    /// The venue answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
        /// Value of a `Retry-After` header, if the venue sent one
        retry_after: Option<Duration>,
    },

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was reset.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The venue answered, but the payload could not be decoded or mapped.
    #[error("failed to decode venue payload: {0}")]
    Decode(String),

    /// Any other transport failure, kept opaque.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// An already-classified error raised inside a collaborator (for example a
    /// signer refusing to run without credentials). Mappers pass it through.
    #[error(transparent)]
    Core(Error),
}

impl RawError {
    /// Creates a status error, truncating oversized bodies.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: truncate_message(body.into()),
            retry_after: None,
        }
    }

    /// Creates a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(truncate_message(msg.into()))
    }

    /// Returns the HTTP status if this is a status error.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a transport may reasonably retry the request that produced this error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connection(_) => true,
            Self::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

impl From<Error> for RawError {
    fn from(e: Error) -> Self {
        Self::Core(e)
    }
}

impl From<serde_json::Error> for RawError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}

impl From<reqwest::Error> for RawError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connection(truncate_message(e.to_string()))
        } else if let Some(status) = e.status() {
            Self::status(status.as_u16(), e.to_string())
        } else if e.is_decode() {
            Self::decode(e.to_string())
        } else {
            Self::Transport(Box::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let err = RawError::status(500, "x".repeat(5000));
        match err {
            RawError::Status { body, .. } => {
                assert!(body.ends_with("... (truncated)"));
                assert!(body.len() < 5000);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(RawError::Timeout.is_transient());
        assert!(RawError::Connection("reset".into()).is_transient());
        assert!(RawError::status(503, "").is_transient());
        assert!(RawError::status(429, "").is_transient());
        assert!(!RawError::status(404, "").is_transient());
        assert!(!RawError::decode("bad json").is_transient());
        assert!(!RawError::Core(Error::authentication("no key")).is_transient());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let raw = RawError::from(Error::authentication("API key is required"));
        assert_eq!(
            raw.to_string(),
            "Authentication error: API key is required"
        );
    }

    #[test]
    fn test_derived_error_sources_alongside_domain_error() {
        let raw = RawError::Transport(Box::new(std::io::Error::other("broken pipe")));
        let source = StdError::source(&raw).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("broken pipe"));

        let core: RawError = Error::not_implemented("fetchEvents").into();
        assert!(matches!(core, RawError::Core(Error::NotImplemented(_))));
    }
}
