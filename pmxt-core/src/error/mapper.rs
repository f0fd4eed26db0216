//! The error-mapper hook: the single conversion point from [`RawError`] to [`Error`].

use super::{Error, NetworkError, ParseError, RawError};
use std::fmt;

/// Normalizes collaborator failures into venue-agnostic error categories.
///
/// The runtime calls [`map`](ErrorMapper::map) exactly once for every raw failure
/// that surfaces to a caller. Venues with their own error codes plug in a custom
/// mapper; everyone else uses [`DefaultErrorMapper`].
pub trait ErrorMapper: Send + Sync + fmt::Debug {
    /// Converts a raw failure into a classified error.
    fn map(&self, raw: RawError) -> Error;
}

/// Status-code based mapping shared by most HTTP venues.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorMapper {
    exchange_id: String,
}

impl DefaultErrorMapper {
    /// Creates a mapper that tags exchange errors with the venue id.
    pub fn new(exchange_id: impl Into<String>) -> Self {
        Self {
            exchange_id: exchange_id.into(),
        }
    }

    fn prefixed(&self, message: String) -> String {
        if self.exchange_id.is_empty() {
            message
        } else {
            format!("[{}] {message}", self.exchange_id)
        }
    }
}

impl ErrorMapper for DefaultErrorMapper {
    fn map(&self, raw: RawError) -> Error {
        match raw {
            RawError::Status {
                status,
                body,
                retry_after,
            } => match status {
                401 | 403 => Error::authentication(self.prefixed(body)),
                404 => Error::not_found("Resource", self.prefixed(body)),
                429 => Error::rate_limit(self.prefixed(body), retry_after),
                _ => {
                    let data = serde_json::from_str(&body).ok();
                    let message = self.prefixed(body);
                    match data {
                        Some(data) => Error::exchange_with_data(status.to_string(), message, data),
                        None => Error::exchange(status.to_string(), message),
                    }
                }
            },
            RawError::Timeout => Error::from(NetworkError::Timeout),
            RawError::Connection(msg) => Error::from(NetworkError::ConnectionFailed(msg)),
            RawError::Decode(msg) => Error::from(ParseError::invalid_format("response", msg)),
            RawError::Transport(source) => Error::from(NetworkError::Transport(source)),
            RawError::Core(err) => err,
        }
    }
}
