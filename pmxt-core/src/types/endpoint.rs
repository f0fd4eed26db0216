//! Declarative endpoint catalog types
//!
//! An [`ApiDescriptor`] groups named [`EndpointDescriptor`]s under one base URL.
//! Descriptors are plain data and deserialize from the camelCase JSON catalogs
//! venues ship with:
//!
//! ```rust
//! use pmxt_core::types::{ApiDescriptor, HttpMethod};
//!
//! let api = ApiDescriptor::from_json(r#"{
//!     "baseUrl": "https://api.example.com",
//!     "endpoints": {
//!         "getMarket": {"method": "GET", "path": "/markets/{id}", "isPrivate": false}
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(api.endpoints["getMarket"].method, HttpMethod::Get);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ContextExt, Result};

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Uppercase verb.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if remaining parameters travel in the query string.
    ///
    /// GET and DELETE carry parameters in the query; every other verb sends a
    /// JSON body.
    #[inline]
    pub const fn uses_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(crate::error::Error::invalid_argument(format!(
                "Unsupported HTTP method: {other}"
            ))),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One endpoint in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    /// HTTP verb
    pub method: HttpMethod,
    /// Path template, `{name}` tokens are substituted from call parameters
    pub path: String,
    /// Whether the call must be signed
    #[serde(default)]
    pub is_private: bool,
    /// Upstream operation identifier, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl EndpointDescriptor {
    /// Public endpoint
    pub fn public(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            is_private: false,
            operation_id: None,
        }
    }

    /// Private (signed) endpoint
    pub fn private(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            is_private: true,
            ..Self::public(method, path)
        }
    }

    /// Attach an upstream operation id
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }
}

/// A named set of endpoints sharing a base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescriptor {
    /// Base URL prefixed to every resolved path
    pub base_url: String,
    /// Endpoints keyed by operation name
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointDescriptor>,
}

impl ApiDescriptor {
    /// Empty descriptor for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints: BTreeMap::new(),
        }
    }

    /// Add an endpoint, builder style.
    pub fn endpoint(mut self, name: impl Into<String>, descriptor: EndpointDescriptor) -> Self {
        self.endpoints.insert(name.into(), descriptor);
        self
    }

    /// Parse a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid API descriptor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_routing() {
        assert!(HttpMethod::Get.uses_query());
        assert!(HttpMethod::Delete.uses_query());
        assert!(!HttpMethod::Post.uses_query());
        assert!(!HttpMethod::Put.uses_query());
        assert!(!HttpMethod::Patch.uses_query());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_descriptor_from_json() {
        let api = ApiDescriptor::from_json(
            r#"{
                "baseUrl": "https://clob.example.com",
                "endpoints": {
                    "getOrders": {"method": "GET", "path": "/orders", "isPrivate": true},
                    "postOrder": {"method": "POST", "path": "/order", "isPrivate": true, "operationId": "createOrder"},
                    "getBook": {"method": "GET", "path": "/book/{token_id}"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(api.base_url, "https://clob.example.com");
        assert_eq!(api.endpoints.len(), 3);
        assert!(api.endpoints["getOrders"].is_private);
        assert!(!api.endpoints["getBook"].is_private);
        assert_eq!(
            api.endpoints["postOrder"].operation_id.as_deref(),
            Some("createOrder")
        );
    }

    #[test]
    fn test_descriptor_builder() {
        let api = ApiDescriptor::new("https://api.example.com")
            .endpoint("a", EndpointDescriptor::public(HttpMethod::Get, "/a"))
            .endpoint("b", EndpointDescriptor::private(HttpMethod::Post, "/b"));
        assert!(!api.endpoints["a"].is_private);
        assert!(api.endpoints["b"].is_private);
    }

    #[test]
    fn test_malformed_catalog_is_parse_error() {
        let err = ApiDescriptor::from_json("{\"baseUrl\": 1}").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
    }
}
