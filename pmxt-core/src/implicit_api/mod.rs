//! Implicit API
//!
//! Turns declarative endpoint catalogs ([`ApiDescriptor`]) into named
//! operations callable through [`ImplicitApi::invoke`]. Each call resolves the
//! path template, signs private endpoints, routes the remaining parameters to
//! the query string (`GET`/`DELETE`) or a JSON body (everything else) and
//! hands the request to the [`Transport`].
//!
//! Registration is additive and idempotent: a name is bound the first time it
//! is seen and never replaced, and names of hand-written unified operations
//! are never bound at all.
//!
//! ```rust,no_run
//! use pmxt_core::implicit_api::ImplicitApi;
//! use pmxt_core::types::{ApiDescriptor, EndpointDescriptor, HttpMethod};
//! # use std::sync::Arc;
//! # async fn demo(api: ImplicitApi) -> pmxt_core::Result<()> {
//! let catalog = ApiDescriptor::new("https://api.example.com")
//!     .endpoint("getMarket", EndpointDescriptor::public(HttpMethod::Get, "/markets/{id}"));
//! api.register(&catalog);
//!
//! let mut params = pmxt_core::types::ApiParams::new();
//! params.insert("id".into(), "42".into());
//! let body = api.invoke("getMarket", params).await?;
//! # Ok(())
//! # }
//! ```

mod template;

pub use template::{placeholders, resolve_path};

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::auth::Signer;
use crate::error::{Error, ErrorMapper, Result};
use crate::transport::{RequestOptions, Transport};
use crate::types::{ApiDescriptor, ApiParams, EndpointDescriptor};

/// Names of the hand-written unified operations. Catalog entries with these
/// names (camelCase or snake_case) are never registered.
pub const RESERVED_OPERATIONS: &[&str] = &[
    "fetchMarkets",
    "fetchMarketsPaginated",
    "fetchMarket",
    "loadMarkets",
    "fetchOrderBook",
    "getExecutionPrice",
    "getExecutionPriceDetailed",
    "filterMarkets",
    "fetchEvents",
    "fetchEvent",
    "filterEvents",
    "fetchOHLCV",
    // camelCase form of `fetch_ohlcv`
    "fetchOhlcv",
    "fetchTrades",
    "callApi",
    "has",
];

/// A registered endpoint bound to the base URL it was registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundEndpoint {
    /// Base URL of the catalog the endpoint came from
    pub base_url: String,
    /// The endpoint itself
    pub endpoint: EndpointDescriptor,
}

impl BoundEndpoint {
    fn url(&self, resolved_path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if resolved_path.starts_with('/') {
            format!("{base}{resolved_path}")
        } else {
            format!("{base}/{resolved_path}")
        }
    }
}

/// Registry and dispatcher for catalog-defined operations.
#[derive(Debug)]
pub struct ImplicitApi {
    operations: RwLock<BTreeMap<String, BoundEndpoint>>,
    reserved: BTreeSet<String>,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn Signer>,
    mapper: Arc<dyn ErrorMapper>,
}

impl ImplicitApi {
    /// Empty registry reserving [`RESERVED_OPERATIONS`].
    pub fn new(
        transport: Arc<dyn Transport>,
        signer: Arc<dyn Signer>,
        mapper: Arc<dyn ErrorMapper>,
    ) -> Self {
        Self {
            operations: RwLock::new(BTreeMap::new()),
            reserved: RESERVED_OPERATIONS.iter().map(|s| (*s).to_string()).collect(),
            transport,
            signer,
            mapper,
        }
    }

    /// Reserves an additional name, e.g. a venue-specific hand-written method.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    /// Whether `name` belongs to a hand-written operation.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.reserved.contains(&snake_to_camel(name))
    }

    /// Binds every new, non-reserved endpoint of `descriptor`.
    ///
    /// Returns the names that were added by this call.
    pub fn register(&self, descriptor: &ApiDescriptor) -> Vec<String> {
        let mut operations = self.operations.write();
        let mut added = Vec::new();

        for (name, endpoint) in &descriptor.endpoints {
            if self.is_reserved(name) {
                debug!(operation = %name, "Skipping endpoint shadowed by a unified operation");
                continue;
            }
            if operations.contains_key(name) {
                continue;
            }
            operations.insert(
                name.clone(),
                BoundEndpoint {
                    base_url: descriptor.base_url.clone(),
                    endpoint: endpoint.clone(),
                },
            );
            added.push(name.clone());
        }

        debug!(
            base_url = %descriptor.base_url,
            added = added.len(),
            total = operations.len(),
            "Registered API descriptor"
        );
        added
    }

    /// Whether `name` is callable.
    pub fn has(&self, name: &str) -> bool {
        self.operations.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.operations.read().keys().cloned().collect()
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.operations.read().is_empty()
    }

    /// The endpoint bound to `name`.
    pub fn endpoint(&self, name: &str) -> Option<BoundEndpoint> {
        self.operations.read().get(name).cloned()
    }

    /// Calls the operation registered as `name` and returns the response body.
    #[instrument(name = "implicit_api_invoke", skip(self, params), fields(operation = %name))]
    pub async fn invoke(&self, name: &str, mut params: ApiParams) -> Result<Value> {
        let bound = self
            .endpoint(name)
            .ok_or_else(|| Error::operation_not_found(name))?;
        let EndpointDescriptor {
            method, path, is_private, ..
        } = &bound.endpoint;

        let resolved = resolve_path(path, &mut params)?;

        let mut options = RequestOptions::new();
        if *is_private {
            options.headers = self.signer.sign(*method, &resolved, &params).await?;
        }

        if method.uses_query() {
            if !params.is_empty() {
                options.query = Some(params);
            }
        } else {
            options.body = Some(Value::Object(params.into_iter().collect()));
            options
                .headers
                .insert("Content-Type".to_string(), "application/json".to_string());
        }

        let url = bound.url(&resolved);
        debug!(method = %method, url = %url, private = is_private, "Dispatching implicit API call");

        let response = self
            .transport
            .send(*method, &url, options)
            .await
            .map_err(|raw| self.mapper.map(raw))?;
        Ok(response.body)
    }
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
