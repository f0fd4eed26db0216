//! Decoding failure details.

use std::borrow::Cow;
use thiserror::Error;

/// A venue payload, catalog or timestamp that could not be decoded.
///
/// ```rust
/// use pmxt_core::error::{Error, ErrorKind, ParseError};
///
/// let err: Error = ParseError::invalid_format("response", "expected an array").into();
/// assert_eq!(err.kind(), ErrorKind::Parse);
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Decimal parsing failed.
    #[error("Failed to parse decimal: {0}")]
    Decimal(#[from] rust_decimal::Error),

    /// JSON deserialization failed.
    #[error("Failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp could not be parsed or is out of range.
    #[error("Failed to parse timestamp: {0}")]
    Timestamp(Cow<'static, str>),

    /// Payload did not have the expected shape.
    #[error("Invalid format for '{field}': {message}")]
    InvalidFormat {
        /// What was being decoded
        field: Cow<'static, str>,
        /// What went wrong
        message: Cow<'static, str>,
    },
}

impl ParseError {
    /// Timestamp error with a static message.
    #[must_use]
    pub fn timestamp(message: &'static str) -> Self {
        Self::Timestamp(Cow::Borrowed(message))
    }

    /// Timestamp error with a formatted message.
    #[must_use]
    pub fn timestamp_owned(message: String) -> Self {
        Self::Timestamp(Cow::Owned(message))
    }

    /// Shape mismatch while decoding `field`.
    pub fn invalid_format(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            message: message.into(),
        }
    }
}
