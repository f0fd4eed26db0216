//! Venue collaborator
//!
//! A [`Venue`] is the adapter-side half of an exchange: it knows one venue's
//! wire format and maps raw payloads into unified records. The runtime owns
//! caching, pagination, the implicit API and error normalization, so a venue
//! only has to fetch and map.

use async_trait::async_trait;
use std::fmt;

use crate::capability::ExchangeCapabilities;
use crate::error::{Error, RawError, RawResult};
use crate::types::{
    ApiDescriptor, EventFetchParams, MarketFetchParams, OhlcvParams, OrderBook, PriceCandle,
    Trade, TradesParams, UnifiedEvent, UnifiedMarket,
};

/// One venue's fetch-and-map layer.
///
/// Failures are returned as [`RawError`](crate::error::RawError); the runtime
/// maps them exactly once before a caller sees them.
#[async_trait]
pub trait Venue: Send + Sync + fmt::Debug {
    /// Short identifier, e.g. `"polymarket"`.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Operations this venue serves natively.
    fn capabilities(&self) -> ExchangeCapabilities;

    /// Endpoint catalogs to expose through the implicit API.
    fn api_descriptors(&self) -> Vec<ApiDescriptor> {
        Vec::new()
    }

    /// Operation names the implicit API must never register for this venue,
    /// on top of the unified operation names.
    fn reserved_operations(&self) -> Vec<String> {
        Vec::new()
    }

    /// Every market matching `params`.
    ///
    /// Pagination fields are stripped by the runtime before this is called;
    /// implementations return the complete eligible set.
    async fn fetch_markets(&self, params: &MarketFetchParams) -> RawResult<Vec<UnifiedMarket>>;

    /// Order book for one outcome.
    async fn fetch_order_book(&self, outcome_id: &str) -> RawResult<OrderBook>;

    /// Every event matching `params`, pagination stripped.
    async fn fetch_events(&self, _params: &EventFetchParams) -> RawResult<Vec<UnifiedEvent>> {
        Err(unsupported("fetchEvents"))
    }

    /// Price candles for one outcome.
    async fn fetch_ohlcv(
        &self,
        _outcome_id: &str,
        _params: &OhlcvParams,
    ) -> RawResult<Vec<PriceCandle>> {
        Err(unsupported("fetchOHLCV"))
    }

    /// Trade history for one outcome.
    async fn fetch_trades(&self, _outcome_id: &str, _params: &TradesParams) -> RawResult<Vec<Trade>> {
        Err(unsupported("fetchTrades"))
    }
}

fn unsupported(feature: &'static str) -> RawError {
    RawError::Core(Error::not_implemented(feature))
}
