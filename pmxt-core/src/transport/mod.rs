//! Transport collaborator
//!
//! The runtime never talks to the network directly. It hands a fully resolved
//! request to a [`Transport`] and gets back a [`RawResponse`] or a
//! [`RawError`](crate::error::RawError). [`HttpTransport`] is the `reqwest`
//! implementation; tests substitute in-process fakes.

mod http;
mod retry;

pub use http::{HttpConfig, HttpTransport};
pub use retry::{RetryConfig, RetryStrategy, RetryStrategyType};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::RawResult;
use crate::types::{ApiParams, HttpMethod};

/// Header name/value pairs.
pub type Headers = BTreeMap<String, String>;

/// Request parts other than method and URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters, `None` when there are none
    pub query: Option<ApiParams>,
    /// JSON body
    pub body: Option<Value>,
    /// Extra headers, auth headers included
    pub headers: Headers,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Query parameters.
    pub fn query(mut self, query: ApiParams) -> Self {
        self.query = Some(query);
        self
    }

    /// JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// One header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: Headers,
    /// Decoded JSON body; non-JSON bodies arrive as a string, empty bodies as null
    pub body: Value,
}

impl RawResponse {
    /// A `200` with `body` and no headers.
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: Headers::new(),
            body,
        }
    }
}

/// Sends requests to a venue.
///
/// Implementations report non-2xx answers as
/// [`RawError::Status`](crate::error::RawError::Status). Any retry policy lives
/// here, not in the runtime.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Performs one logical request.
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> RawResult<RawResponse>;
}

/// Renders a parameter value the way it appears in a URL.
///
/// Strings are used verbatim, `null` becomes empty, everything else is its JSON text.
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Flattens parameters into ordered query pairs.
pub fn query_pairs(params: &ApiParams) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), param_to_string(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_to_string() {
        assert_eq!(param_to_string(&json!("abc")), "abc");
        assert_eq!(param_to_string(&json!(42)), "42");
        assert_eq!(param_to_string(&json!(true)), "true");
        assert_eq!(param_to_string(&json!(null)), "");
        assert_eq!(param_to_string(&json!(["a", 1])), r#"["a",1]"#);
    }

    #[test]
    fn test_query_pairs_sorted_by_key() {
        let mut params = ApiParams::new();
        params.insert("b".into(), json!(2));
        params.insert("a".into(), json!("x"));
        assert_eq!(
            query_pairs(&params),
            vec![("a".to_string(), "x".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_request_options_builder() {
        let opts = RequestOptions::new()
            .header("X-Key", "k")
            .body(json!({"a": 1}));
        assert_eq!(opts.headers.get("X-Key").map(String::as_str), Some("k"));
        assert!(opts.query.is_none());
        assert_eq!(opts.body, Some(json!({"a": 1})));
    }
}
