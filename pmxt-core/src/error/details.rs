//! Payload of [`Error::Exchange`](super::Error::Exchange).

use serde_json::Value;

#[cfg(feature = "backtrace")]
use std::backtrace::Backtrace;

/// A venue rejection that fits no narrower category.
///
/// `code` is the HTTP status for failures classified by
/// [`DefaultErrorMapper`](super::DefaultErrorMapper), or whatever code the venue
/// put in its body for custom mappers. A JSON body is kept in `data`.
///
/// ```rust
/// use pmxt_core::error::ExchangeErrorDetails;
/// use serde_json::json;
///
/// let details = ExchangeErrorDetails::with_data("400", "[kalshi] bad ticker", json!({"code": "bad_ticker"}));
/// assert_eq!(details.http_status(), Some(400));
/// assert_eq!(details.to_string(), "[kalshi] bad ticker (code: 400)");
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub struct ExchangeErrorDetails {
    /// Status or venue error code
    pub code: String,
    /// Message, prefixed with the exchange id
    pub message: String,
    /// Decoded JSON body, if the venue sent one
    pub data: Option<Value>,
    /// Backtrace captured at error creation (feature-gated).
    #[cfg(feature = "backtrace")]
    pub backtrace: Backtrace,
}

impl ExchangeErrorDetails {
    /// Details without a body.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
            #[cfg(feature = "backtrace")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Details with the decoded body.
    pub fn with_data(code: impl Into<String>, message: impl Into<String>, data: Value) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: Some(data),
            #[cfg(feature = "backtrace")]
            backtrace: Backtrace::capture(),
        }
    }

    /// `code` read as an HTTP status, when it is one.
    pub fn http_status(&self) -> Option<u16> {
        self.code.parse::<u16>().ok().filter(|s| (100..600).contains(s))
    }
}

impl std::fmt::Display for ExchangeErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}
