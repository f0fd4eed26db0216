//! `ContextExt`: context breadcrumbs on results and options.

use crate::error::{Error, Result};
use std::fmt;

/// Attaches a breadcrumb to a failing `Result` or a missing `Option`.
///
/// A `None` becomes `InvalidArgument` carrying the context text. Use
/// `with_context` when the message needs formatting.
///
/// ```rust
/// use pmxt_core::error::{ContextExt, ErrorKind, Result};
/// use serde_json::json;
///
/// fn outcome_id(raw: &serde_json::Value) -> Result<&str> {
///     raw.get("token_id")
///         .and_then(|v| v.as_str())
///         .context("outcome without token_id")
/// }
///
/// let err = outcome_id(&json!({"price": "0.4"})).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
///
/// let parsed: Result<u32> = "x".parse::<u32>()
///     .map_err(|e| pmxt_core::Error::invalid_argument(e.to_string()))
///     .with_context(|| format!("page {}", 2));
/// assert!(parsed.unwrap_err().to_string().starts_with("page 2"));
/// ```
pub trait ContextExt<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds lazy context to an error (only evaluated on error).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ContextExt<T, E> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| e.into().context(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f().to_string()))
    }
}

impl<T> ContextExt<T, Error> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::invalid_argument(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::invalid_argument(f().to_string()))
    }
}
