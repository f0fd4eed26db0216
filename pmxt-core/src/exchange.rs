//! # Unified Exchange Trait
//!
//! [`Exchange`] is the polymorphic surface callers program against. Every
//! venue, once wrapped in an [`ExchangeRuntime`](crate::runtime::ExchangeRuntime),
//! is reachable through it as a `dyn Exchange`.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Exchange Trait                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  Metadata                                                │
//! │  └── id(), name(), capabilities(), has()                 │
//! ├──────────────────────────────────────────────────────────┤
//! │  Markets                                                 │
//! │  ├── load_markets(), market(), market_by_slug()          │
//! │  ├── fetch_markets(), fetch_markets_paginated()          │
//! │  └── fetch_market()                                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  Events and history                                      │
//! │  ├── fetch_events(), fetch_event()                       │
//! │  └── fetch_ohlcv(), fetch_trades()                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  Order books and pricing                                 │
//! │  ├── fetch_order_book()                                  │
//! │  └── get_execution_price(), get_execution_price_detailed()│
//! ├──────────────────────────────────────────────────────────┤
//! │  Catalog endpoints and local helpers                     │
//! │  └── call_api(), filter_markets(), filter_events()       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use pmxt_core::exchange::Exchange;
//! use pmxt_core::types::{MarketFetchParams, OrderSide};
//! use rust_decimal_macros::dec;
//!
//! async fn cheapest_fill(exchange: &dyn Exchange) -> pmxt_core::Result<()> {
//!     let page = exchange
//!         .fetch_markets_paginated(&MarketFetchParams::new().limit(20))
//!         .await?;
//!     for market in &page.data {
//!         if let Some(yes) = market.yes() {
//!             let book = exchange.fetch_order_book(&yes.outcome_id).await?;
//!             let price = exchange.get_execution_price(&book, OrderSide::Buy, dec!(100))?;
//!             println!("{}: {price}", market.title);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;

use crate::capability::{ExchangeCapabilities, Support};
use crate::error::Result;
use crate::execution::{self, ExecutionPriceResult};
use crate::filter::{self, EventFilter, MarketFilter};
use crate::runtime::IndexedMarkets;
use crate::types::{
    ApiParams, EventFetchParams, MarketFetchParams, OhlcvParams, OrderBook, OrderSide,
    PaginatedMarketsResult, PriceCandle, Trade, TradesParams, UnifiedEvent, UnifiedMarket,
};

/// The unified exchange interface.
///
/// Errors are always classified [`Error`](crate::Error)s; venue failures have
/// been through the exchange's error mapper exactly once.
#[async_trait]
pub trait Exchange: Send + Sync {
    // ==================== Metadata ====================

    /// Short identifier, e.g. `"polymarket"`.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Native and emulated capabilities.
    fn capabilities(&self) -> ExchangeCapabilities;

    /// Support level for a camelCase feature name, e.g. `"fetchOrderBook"`.
    fn has(&self, feature: &str) -> Support {
        self.capabilities().has(feature)
    }

    // ==================== Markets ====================

    /// Loads every market into the local index, or returns the loaded index.
    ///
    /// With `reload` the index is rebuilt from a fresh listing.
    async fn load_markets(&self, reload: bool) -> Result<Arc<IndexedMarkets>>;

    /// A market from the loaded index, by id.
    fn market(&self, market_id: &str) -> Option<Arc<UnifiedMarket>>;

    /// A market from the loaded index, by slug.
    fn market_by_slug(&self, slug: &str) -> Option<Arc<UnifiedMarket>>;

    /// Markets matching `params`.
    async fn fetch_markets(&self, params: &MarketFetchParams) -> Result<Vec<UnifiedMarket>>;

    /// One page of markets matching `params`, with a cursor to the next page.
    async fn fetch_markets_paginated(
        &self,
        params: &MarketFetchParams,
    ) -> Result<PaginatedMarketsResult>;

    /// The first market matching `params`, or `NotFound`.
    async fn fetch_market(&self, params: &MarketFetchParams) -> Result<UnifiedMarket>;

    // ==================== Events ====================

    /// Events matching `params`.
    async fn fetch_events(&self, params: &EventFetchParams) -> Result<Vec<UnifiedEvent>>;

    /// The first event matching `params`, or `NotFound`.
    async fn fetch_event(&self, params: &EventFetchParams) -> Result<UnifiedEvent>;

    // ==================== History ====================

    /// Price candles for one outcome, oldest first.
    async fn fetch_ohlcv(&self, outcome_id: &str, params: &OhlcvParams) -> Result<Vec<PriceCandle>>;

    /// Trade history for one outcome.
    async fn fetch_trades(&self, outcome_id: &str, params: &TradesParams) -> Result<Vec<Trade>>;

    // ==================== Order books ====================

    /// Order book for one outcome, bids descending and asks ascending.
    async fn fetch_order_book(&self, outcome_id: &str) -> Result<OrderBook>;

    /// Average fill price for `amount`, 0 when the book cannot fill it.
    fn get_execution_price(
        &self,
        book: &OrderBook,
        side: OrderSide,
        amount: Decimal,
    ) -> Result<Decimal> {
        execution::execution_price(book, side, amount)
    }

    /// Average fill price, filled quantity and whether the fill completed.
    fn get_execution_price_detailed(
        &self,
        book: &OrderBook,
        side: OrderSide,
        amount: Decimal,
    ) -> Result<ExecutionPriceResult> {
        execution::execution_price_detailed(book, side, amount)
    }

    // ==================== Catalog endpoints ====================

    /// Calls a catalog-defined endpoint by name.
    async fn call_api(&self, name: &str, params: ApiParams) -> Result<Value>;

    // ==================== Local helpers ====================

    /// Markets from `markets` satisfying `filter`.
    fn filter_markets(&self, markets: &[UnifiedMarket], filter: &MarketFilter) -> Vec<UnifiedMarket> {
        filter::filter_markets(markets, filter)
    }

    /// Events from `events` satisfying `filter`.
    fn filter_events(&self, events: &[UnifiedEvent], filter: &EventFilter) -> Vec<UnifiedEvent> {
        filter::filter_events(events, filter)
    }
}

/// Owned trait object.
pub type BoxedExchange = Box<dyn Exchange>;

/// Shared trait object.
pub type ArcExchange = Arc<dyn Exchange>;

/// Conveniences built on [`Exchange`].
#[async_trait]
pub trait ExchangeExt: Exchange {
    /// Fetches a market by id.
    async fn fetch_market_by_id(&self, market_id: &str) -> Result<UnifiedMarket> {
        self.fetch_market(&MarketFetchParams::new().market_id(market_id))
            .await
    }

    /// Fetches a market by slug.
    async fn fetch_market_by_slug(&self, slug: &str) -> Result<UnifiedMarket> {
        self.fetch_market(&MarketFetchParams::new().slug(slug)).await
    }

    /// Fetches an event by id.
    async fn fetch_event_by_id(&self, event_id: &str) -> Result<UnifiedEvent> {
        self.fetch_event(&EventFetchParams::new().event_id(event_id))
            .await
    }

    /// Follows `next_cursor` from the first page until the listing is exhausted.
    ///
    /// `params.limit` sets the page size.
    async fn fetch_all_pages(&self, params: &MarketFetchParams) -> Result<Vec<UnifiedMarket>> {
        let mut page = self.fetch_markets_paginated(params).await?;
        let mut markets = std::mem::take(&mut page.data);
        while let Some(cursor) = page.next_cursor.take() {
            let mut next = MarketFetchParams::new().cursor(cursor);
            next.limit = params.limit;
            page = self.fetch_markets_paginated(&next).await?;
            markets.append(&mut page.data);
        }
        Ok(markets)
    }
}

impl<T: Exchange + ?Sized> ExchangeExt for T {}
