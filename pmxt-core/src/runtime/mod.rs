//! Exchange runtime
//!
//! [`ExchangeRuntime`] wraps a [`Venue`] and gives it the full [`Exchange`]
//! surface: a market index with id and slug lookup, stable cursor pagination,
//! the implicit API built from the venue's endpoint catalogs, execution price
//! simulation and local filtering. Venue failures pass through the runtime's
//! [`ErrorMapper`] exactly once on their way out.
//!
//! ```rust,no_run
//! use pmxt_core::prelude::*;
//! use pmxt_core::runtime::{ExchangeRuntime, RuntimeConfig};
//! use std::sync::Arc;
//!
//! # async fn demo(venue: Arc<dyn Venue>) -> Result<()> {
//! let exchange = ExchangeRuntime::builder(venue)
//!     .config(RuntimeConfig::builder().api_key("key").build())
//!     .build()?;
//!
//! exchange.load_markets(false).await?;
//! let market = exchange.fetch_market(&MarketFetchParams::new().slug("fed-cut-march")).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod market_index;

pub use config::{RuntimeConfig, RuntimeConfigBuilder};
pub use market_index::{IndexedMarkets, MarketIndex};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::{ApiKeySigner, Signer};
use crate::capability::{Capabilities, ExchangeCapabilities};
use crate::error::{DefaultErrorMapper, Error, ErrorMapper, Result};
use crate::exchange::Exchange;
use crate::implicit_api::ImplicitApi;
use crate::pagination::PaginationEngine;
use crate::time::{Clock, SystemClock};
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    ApiDescriptor, ApiParams, EventFetchParams, MarketFetchParams, OhlcvParams, OrderBook,
    PaginatedMarketsResult, PriceCandle, Trade, TradesParams, UnifiedEvent, UnifiedMarket,
};
use crate::venue::Venue;

/// A venue wrapped with caching, pagination and the implicit API.
#[derive(Debug)]
pub struct ExchangeRuntime {
    id: String,
    name: String,
    venue: Arc<dyn Venue>,
    config: RuntimeConfig,
    index: MarketIndex,
    pagination: PaginationEngine,
    api: ImplicitApi,
    mapper: Arc<dyn ErrorMapper>,
}

impl ExchangeRuntime {
    /// Starts a builder around `venue`.
    pub fn builder(venue: Arc<dyn Venue>) -> ExchangeRuntimeBuilder {
        ExchangeRuntimeBuilder::new(venue)
    }

    /// The wrapped venue.
    pub fn venue(&self) -> &Arc<dyn Venue> {
        &self.venue
    }

    /// Effective configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Market index.
    pub fn market_index(&self) -> &MarketIndex {
        &self.index
    }

    /// Pagination engine.
    pub fn pagination(&self) -> &PaginationEngine {
        &self.pagination
    }

    /// Implicit API registry.
    pub fn implicit_api(&self) -> &ImplicitApi {
        &self.api
    }

    /// Registers another endpoint catalog, honouring configured URL overrides.
    ///
    /// Returns the operation names that became callable.
    pub fn register_api(&self, descriptor: &ApiDescriptor) -> Vec<String> {
        let base_url = self.config.resolve_base_url(&descriptor.base_url);
        if base_url == descriptor.base_url {
            return self.api.register(descriptor);
        }
        let overridden = ApiDescriptor {
            base_url: base_url.to_string(),
            endpoints: descriptor.endpoints.clone(),
        };
        self.api.register(&overridden)
    }

    /// Calls the venue listing and maps its failure.
    async fn list_from_venue(&self, params: &MarketFetchParams) -> Result<Vec<UnifiedMarket>> {
        self.venue
            .fetch_markets(params)
            .await
            .map_err(|raw| self.mapper.map(raw))
    }

    /// Calls the venue event listing and maps its failure.
    async fn events_from_venue(&self, params: &EventFetchParams) -> Result<Vec<UnifiedEvent>> {
        self.venue
            .fetch_events(params)
            .await
            .map_err(|raw| self.mapper.map(raw))
    }
}

fn slice_local<'a, T, I>(items: I, offset: Option<usize>, limit: Option<usize>) -> Vec<T>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let iter = items.skip(offset.unwrap_or(0));
    match limit {
        Some(limit) => iter.take(limit).cloned().collect(),
        None => iter.cloned().collect(),
    }
}

#[async_trait]
impl Exchange for ExchangeRuntime {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> ExchangeCapabilities {
        let venue = self.venue.capabilities();
        let mut emulated = venue.emulated | Capabilities::LOCAL;
        if venue.native.contains(Capabilities::FETCH_MARKETS) {
            emulated |= Capabilities::LOAD_MARKETS
                | Capabilities::FETCH_MARKET
                | Capabilities::FETCH_MARKETS_PAGINATED;
        }
        if venue.native.contains(Capabilities::FETCH_EVENTS) {
            emulated |= Capabilities::FETCH_EVENT;
        }
        if !self.api.is_empty() {
            emulated |= Capabilities::CALL_API;
        }
        ExchangeCapabilities::new(venue.native).with_emulated(emulated)
    }

    #[instrument(name = "load_markets", skip(self), fields(exchange = %self.id))]
    async fn load_markets(&self, reload: bool) -> Result<Arc<IndexedMarkets>> {
        self.index
            .load_with(reload, || async move {
                self.list_from_venue(&MarketFetchParams::new()).await
            })
            .await
    }

    fn market(&self, market_id: &str) -> Option<Arc<UnifiedMarket>> {
        self.index.lookup(market_id)
    }

    fn market_by_slug(&self, slug: &str) -> Option<Arc<UnifiedMarket>> {
        self.index.lookup_by_slug(slug)
    }

    #[instrument(name = "fetch_markets", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_markets(&self, params: &MarketFetchParams) -> Result<Vec<UnifiedMarket>> {
        if params.cursor.is_some() {
            return Ok(self.fetch_markets_paginated(params).await?.data);
        }
        if params.limit == Some(0) {
            return Err(Error::invalid_argument("limit must be greater than 0"));
        }

        if !params.has_lookup_criteria()
            && let Some(index) = self.index.snapshot()
        {
            debug!(
                cached = index.len(),
                offset = ?params.offset,
                limit = ?params.limit,
                "Serving markets from the loaded index"
            );
            let markets = index.markets().iter().map(|m| &**m);
            return Ok(slice_local(markets, params.offset, params.limit));
        }

        let markets = self.list_from_venue(&params.without_pagination()).await?;
        Ok(slice_local(markets.iter(), params.offset, params.limit))
    }

    #[instrument(name = "fetch_markets_paginated", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_markets_paginated(
        &self,
        params: &MarketFetchParams,
    ) -> Result<PaginatedMarketsResult> {
        self.pagination
            .paginate(params, |stripped| async move {
                self.list_from_venue(&stripped).await
            })
            .await
    }

    #[instrument(name = "fetch_market", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_market(&self, params: &MarketFetchParams) -> Result<UnifiedMarket> {
        if let Some(index) = self.index.snapshot() {
            let hit = params
                .market_id
                .as_deref()
                .and_then(|id| index.get(id))
                .or_else(|| params.slug.as_deref().and_then(|s| index.get_by_slug(s)));
            if let Some(market) = hit {
                debug!(market_id = %market.market_id, "Market served from the loaded index");
                return Ok((**market).clone());
            }
        }

        let markets = self.list_from_venue(&params.without_pagination()).await?;
        markets.into_iter().next().ok_or_else(|| {
            let identifier = params.lookup_identifier();
            debug!(identifier, "No market matched");
            Error::market_not_found(identifier)
        })
    }

    #[instrument(name = "fetch_events", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_events(&self, params: &EventFetchParams) -> Result<Vec<UnifiedEvent>> {
        if params.limit == Some(0) {
            return Err(Error::invalid_argument("limit must be greater than 0"));
        }
        let events = self.events_from_venue(&params.without_pagination()).await?;
        Ok(slice_local(events.iter(), params.offset, params.limit))
    }

    #[instrument(name = "fetch_event", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_event(&self, params: &EventFetchParams) -> Result<UnifiedEvent> {
        let events = self.events_from_venue(&params.without_pagination()).await?;
        events.into_iter().next().ok_or_else(|| {
            let identifier = params.lookup_identifier();
            debug!(identifier, "No event matched");
            Error::not_found("Event", identifier)
        })
    }

    #[instrument(name = "fetch_ohlcv", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_ohlcv(&self, outcome_id: &str, params: &OhlcvParams) -> Result<Vec<PriceCandle>> {
        if outcome_id.is_empty() {
            return Err(Error::invalid_argument("outcome_id is required"));
        }
        params.validate()?;
        let mut candles = self
            .venue
            .fetch_ohlcv(outcome_id, params)
            .await
            .map_err(|raw| self.mapper.map(raw))?;
        candles.sort_by_key(|c| c.timestamp);
        if let Some(limit) = params.limit
            && candles.len() > limit
        {
            // Keep the most recent candles.
            let excess = candles.len() - limit;
            candles = candles.split_off(excess);
        }
        Ok(candles)
    }

    #[instrument(name = "fetch_trades", skip(self, params), fields(exchange = %self.id))]
    async fn fetch_trades(&self, outcome_id: &str, params: &TradesParams) -> Result<Vec<Trade>> {
        if outcome_id.is_empty() {
            return Err(Error::invalid_argument("outcome_id is required"));
        }
        params.validate()?;
        self.venue
            .fetch_trades(outcome_id, params)
            .await
            .map_err(|raw| self.mapper.map(raw))
    }

    #[instrument(name = "fetch_order_book", skip(self), fields(exchange = %self.id))]
    async fn fetch_order_book(&self, outcome_id: &str) -> Result<OrderBook> {
        let mut book = self
            .venue
            .fetch_order_book(outcome_id)
            .await
            .map_err(|raw| self.mapper.map(raw))?;
        book.normalize();
        Ok(book)
    }

    async fn call_api(&self, name: &str, params: ApiParams) -> Result<Value> {
        self.api.invoke(name, params).await
    }
}

/// Builder for [`ExchangeRuntime`].
///
/// Every collaborator has a default: an [`HttpTransport`] built from the
/// configuration, an [`ApiKeySigner`] over the configured credentials, a
/// [`DefaultErrorMapper`] and the system clock.
#[derive(Debug)]
pub struct ExchangeRuntimeBuilder {
    venue: Arc<dyn Venue>,
    config: RuntimeConfig,
    transport: Option<Arc<dyn Transport>>,
    signer: Option<Arc<dyn Signer>>,
    mapper: Option<Arc<dyn ErrorMapper>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ExchangeRuntimeBuilder {
    /// Builder with default configuration.
    pub fn new(venue: Arc<dyn Venue>) -> Self {
        Self {
            venue,
            config: RuntimeConfig::default(),
            transport: None,
            signer: None,
            mapper: None,
            clock: None,
        }
    }

    /// Runtime configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Transport for implicit API calls.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Signer for private endpoints.
    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Error mapper for venue failures.
    pub fn error_mapper(mut self, mapper: Arc<dyn ErrorMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Clock for snapshot expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the configuration, wires the collaborators and registers the
    /// venue's endpoint catalogs after its reserved operation names.
    pub fn build(self) -> Result<ExchangeRuntime> {
        let Self {
            venue,
            config,
            transport,
            signer,
            mapper,
            clock,
        } = self;
        config.validate()?;

        let id = config.id.clone().unwrap_or_else(|| venue.id().to_string());
        let name = config.name.clone().unwrap_or_else(|| venue.name().to_string());

        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.http_config())?),
        };
        let signer: Arc<dyn Signer> = match signer {
            Some(signer) => signer,
            None => Arc::new(ApiKeySigner::new(config.credentials())),
        };
        let mapper: Arc<dyn ErrorMapper> = match mapper {
            Some(mapper) => mapper,
            None => Arc::new(DefaultErrorMapper::new(id.clone())),
        };
        let clock: Arc<dyn Clock> = match clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        let mut api = ImplicitApi::new(transport, signer, Arc::clone(&mapper));
        for name in venue.reserved_operations() {
            api.reserve(name);
        }

        let runtime = ExchangeRuntime {
            index: MarketIndex::new(id.clone()),
            pagination: PaginationEngine::new(
                clock,
                config.snapshot_ttl,
                config.default_page_size,
            ),
            api,
            id,
            name,
            venue,
            config,
            mapper,
        };

        let mut registered = 0;
        for descriptor in runtime.venue.api_descriptors() {
            registered += runtime.register_api(&descriptor).len();
        }

        info!(
            exchange = %runtime.id,
            operations = registered,
            "Exchange runtime ready"
        );
        Ok(runtime)
    }
}
