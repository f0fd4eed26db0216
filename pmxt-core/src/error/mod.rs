//! # Error Handling for pmxt-rust
//!
//! Every failure that reaches a caller of the runtime is an [`Error`]. Errors fall
//! into two families:
//!
//! - **Core-detected** errors are raised locally by the runtime and never retried:
//!   invalid arguments, malformed or expired cursors, missing path parameters,
//!   unknown implicit-API operations, missing credentials.
//! - **Venue-originated** errors start life as a [`RawError`] inside a transport or
//!   venue collaborator and are turned into an [`Error`] by an [`ErrorMapper`].
//!   `RawError` has no `From` conversion into `Error`, so the mapper is the only
//!   way across and a venue failure is normalized exactly once.
//!
//! ## Error Hierarchy
//!
//! ```text
//! Error
//! ├── InvalidArgument      - Bad caller input (non-positive amount, zero page size)
//! ├── NotFound             - Market/outcome absent after every fallback
//! ├── InvalidCursor        - Undecodable or structurally invalid cursor token
//! ├── CursorExpired        - Cursor references a swept snapshot
//! ├── MissingPathParameter - Endpoint template placeholder without a value
//! ├── OperationNotFound    - Implicit-API name that was never registered
//! ├── Authentication       - Credentials missing or rejected
//! ├── Exchange             - Normalized venue error (code, message, raw data)
//! ├── Network              - Transport-level failure (via NetworkError)
//! ├── RateLimit            - Venue throttling with optional retry hint
//! ├── Parse                - Response decoding failure (via ParseError)
//! ├── Timeout              - Operation timeout
//! ├── NotImplemented       - Feature not offered by the venue
//! └── Context              - Error with additional context
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pmxt_core::error::{Error, ErrorKind, Result};
//!
//! fn page_size(limit: usize) -> Result<usize> {
//!     if limit == 0 {
//!         return Err(Error::invalid_argument("limit must be greater than zero"));
//!     }
//!     Ok(limit)
//! }
//!
//! let err = page_size(0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidArgument);
//! ```

mod context;
mod convert;
mod details;
mod mapper;
mod network;
mod parse;
mod raw;

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub use context::ContextExt;
pub use details::ExchangeErrorDetails;
pub use mapper::{DefaultErrorMapper, ErrorMapper};
pub use network::NetworkError;
pub use parse::ParseError;
pub use raw::{RawError, RawResult};

pub(crate) use convert::truncate_message;

/// Result type alias for all runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for the runtime.
///
/// Large variants are boxed and static messages use `Cow<'static, str>` so the
/// enum stays small enough to pass around by value on hot paths.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Caller supplied an argument outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),

    /// The requested entity does not exist.
    #[error("{kind} not found: {identifier}")]
    NotFound {
        /// What was looked up ("Market", "Outcome", ...)
        kind: Cow<'static, str>,
        /// The most specific identifier that was tried
        identifier: String,
    },

    /// A pagination cursor could not be decoded.
    #[error("Invalid cursor '{cursor}': {reason}")]
    InvalidCursor {
        /// The offending token (truncated)
        cursor: String,
        /// Why decoding failed
        reason: Cow<'static, str>,
    },

    /// A well-formed cursor points at a snapshot that no longer exists.
    #[error(
        "Cursor expired: snapshot '{snapshot_id}' is no longer available. \
         Restart pagination from the first page (omit the cursor)."
    )]
    CursorExpired {
        /// Identifier of the missing snapshot
        snapshot_id: String,
    },

    /// An endpoint path template references a parameter the caller did not pass.
    #[error("Missing required path parameter '{parameter}' for path '{path}'")]
    MissingPathParameter {
        /// Placeholder name
        parameter: String,
        /// Unresolved path template
        path: String,
    },

    /// No implicit-API operation is registered under this name.
    #[error("Operation not found: {0}")]
    OperationNotFound(String),

    /// Authentication errors (missing credentials, rejected key or signature).
    #[error("Authentication error: {0}")]
    Authentication(Cow<'static, str>),

    /// Normalized venue error. Boxed to reduce enum size.
    #[error("Exchange error: {0}")]
    Exchange(Box<ExchangeErrorDetails>),

    /// Network-related errors. Boxed to reduce enum size.
    #[error("Network error: {0}")]
    Network(Box<NetworkError>),

    /// Rate limit exceeded with optional retry information.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message
        message: Cow<'static, str>,
        /// Optional duration to wait before retrying
        retry_after: Option<Duration>,
    },

    /// Errors during response parsing. Boxed to reduce enum size.
    #[error("Parse error: {0}")]
    Parse(Box<ParseError>),

    /// Operation timeout.
    #[error("Timeout: {0}")]
    Timeout(Cow<'static, str>),

    /// Feature not implemented by this venue.
    #[error("Not implemented: {0}")]
    NotImplemented(Cow<'static, str>),

    /// Error with additional context, preserving the error chain.
    #[error("{context}")]
    Context {
        /// Context message describing what operation failed
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

/// Classification of an [`Error`], independent of context wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`].
    InvalidArgument,
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::InvalidCursor`].
    InvalidCursor,
    /// See [`Error::CursorExpired`].
    CursorExpired,
    /// See [`Error::MissingPathParameter`].
    MissingPathParameter,
    /// See [`Error::OperationNotFound`].
    OperationNotFound,
    /// See [`Error::Authentication`].
    Authentication,
    /// See [`Error::Exchange`].
    Exchange,
    /// See [`Error::Network`].
    Network,
    /// See [`Error::RateLimit`].
    RateLimit,
    /// See [`Error::Parse`].
    Parse,
    /// See [`Error::Timeout`].
    Timeout,
    /// See [`Error::NotImplemented`].
    NotImplemented,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::NotFound => "NotFound",
            Self::InvalidCursor => "InvalidCursor",
            Self::CursorExpired => "CursorExpired",
            Self::MissingPathParameter => "MissingPathParameter",
            Self::OperationNotFound => "OperationNotFound",
            Self::Authentication => "Authentication",
            Self::Exchange => "Exchange",
            Self::Network => "Network",
            Self::RateLimit => "RateLimit",
            Self::Parse => "Parse",
            Self::Timeout => "Timeout",
            Self::NotImplemented => "NotImplemented",
        };
        f.write_str(name)
    }
}

impl Error {
    // ==================== Constructor Methods ====================

    /// Creates an invalid argument error.
    pub fn invalid_argument(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a not-found error for the given entity kind and identifier.
    ///
    /// ```rust
    /// use pmxt_core::error::Error;
    ///
    /// let err = Error::not_found("Market", "will-it-rain");
    /// assert_eq!(err.to_string(), "Market not found: will-it-rain");
    /// ```
    pub fn not_found(kind: impl Into<Cow<'static, str>>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates a market not found error.
    pub fn market_not_found(identifier: impl Into<String>) -> Self {
        Self::not_found("Market", identifier)
    }

    /// Creates an invalid cursor error. Long tokens are truncated in the message.
    pub fn invalid_cursor(cursor: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        let mut shown = cursor.to_string();
        if shown.len() > 64 {
            let mut end = 64;
            while !shown.is_char_boundary(end) {
                end -= 1;
            }
            shown.truncate(end);
            shown.push_str("...");
        }
        Self::InvalidCursor {
            cursor: shown,
            reason: reason.into(),
        }
    }

    /// Creates a cursor expired error.
    pub fn cursor_expired(snapshot_id: impl Into<String>) -> Self {
        Self::CursorExpired {
            snapshot_id: snapshot_id.into(),
        }
    }

    /// Creates a missing path parameter error.
    pub fn missing_path_parameter(parameter: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingPathParameter {
            parameter: parameter.into(),
            path: path.into(),
        }
    }

    /// Creates an operation not found error.
    pub fn operation_not_found(name: impl Into<String>) -> Self {
        Self::OperationNotFound(name.into())
    }

    /// Creates an authentication error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn authentication(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a new exchange error.
    pub fn exchange(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Exchange(Box::new(ExchangeErrorDetails::new(code, message)))
    }

    /// Creates a new exchange error with raw response data.
    pub fn exchange_with_data(
        code: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self::Exchange(Box::new(ExchangeErrorDetails::with_data(
            code, message, data,
        )))
    }

    /// Creates a network error from a message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(Box::new(NetworkError::ConnectionFailed(msg.into())))
    }

    /// Creates a new rate limit error with optional retry duration.
    pub fn rate_limit(
        message: impl Into<Cow<'static, str>>,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a not implemented error.
    pub fn not_implemented(feature: impl Into<Cow<'static, str>>) -> Self {
        Self::NotImplemented(feature.into())
    }

    // ==================== Context Methods ====================

    /// Attaches context to an existing error.
    ///
    /// ```rust
    /// use pmxt_core::error::{Error, ErrorKind};
    ///
    /// let err = Error::network("Connection refused")
    ///     .context("Failed to fetch markets for kalshi");
    /// assert_eq!(err.kind(), ErrorKind::Network);
    /// ```
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    // ==================== Chain Traversal Methods ====================

    fn iter_chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| match err {
            Error::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        })
    }

    /// Returns the root cause of the error, skipping Context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        self.iter_chain().last().unwrap_or(self)
    }

    /// Classifies the error, penetrating Context layers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Context { source, .. } => source.kind(),
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidCursor { .. } => ErrorKind::InvalidCursor,
            Error::CursorExpired { .. } => ErrorKind::CursorExpired,
            Error::MissingPathParameter { .. } => ErrorKind::MissingPathParameter,
            Error::OperationNotFound(_) => ErrorKind::OperationNotFound,
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::Exchange(_) => ErrorKind::Exchange,
            Error::Network(_) => ErrorKind::Network,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::NotImplemented(_) => ErrorKind::NotImplemented,
        }
    }

    /// Generates a detailed error report with the full chain.
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();
        report.push_str(&self.to_string());

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            let _ = write!(report, "\nCaused by: {err}");
            current = err.source();
        }
        report
    }

    // ==================== Helper Methods (Context Penetrating) ====================

    /// Checks if this error is worth retrying by the caller.
    ///
    /// Core-detected errors are never retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(ne) => ne.is_transient(),
            Error::RateLimit { .. } | Error::Timeout(_) => true,
            Error::Context { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns the retry delay if this is a rate limit error.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            Error::Context { source, .. } => source.retry_after(),
            _ => None,
        }
    }

    /// Returns the authentication message if this is an authentication error.
    #[must_use]
    pub fn as_authentication(&self) -> Option<&str> {
        match self {
            Error::Authentication(msg) => Some(msg.as_ref()),
            Error::Context { source, .. } => source.as_authentication(),
            _ => None,
        }
    }

    /// Returns the identifier if this is a not-found error.
    #[must_use]
    pub fn not_found_identifier(&self) -> Option<&str> {
        match self.root_cause() {
            Error::NotFound { identifier, .. } => Some(identifier.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
