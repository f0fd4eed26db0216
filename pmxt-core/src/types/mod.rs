//! Core type definitions
//!
//! Markets, events, price history, order books, endpoint catalogs and call parameters shared by the
//! runtime and every venue adapter.

pub mod endpoint;
pub mod event;
pub mod history;
pub mod market;
pub mod orderbook;
/// Parameter types for listing and lookup calls
pub mod params;
pub mod pagination;

pub use endpoint::{ApiDescriptor, EndpointDescriptor, HttpMethod};
pub use event::{EventFetchParams, UnifiedEvent};
pub use history::{OhlcvParams, PriceCandle, Trade, TradeSide, TradesParams};
pub use market::{MarketOutcome, OutcomeRole, UnifiedMarket};
pub use orderbook::{OrderBook, OrderLevel, OrderSide};
pub use pagination::PaginatedMarketsResult;
pub use params::{ApiParams, MarketFetchParams, MarketSort, MarketStatus, SearchIn};

/// Millisecond timestamp
pub type Timestamp = i64;
