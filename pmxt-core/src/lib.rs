//! pmxt core runtime
//!
//! The shared runtime every prediction-market venue plugs into. A venue adapter
//! implements [`Venue`] (fetch and map); [`ExchangeRuntime`] adds the rest:
//!
//! - **Market index**: load once, look up by id or slug, reload atomically
//! - **Stable pagination**: cursor pages served from frozen snapshots
//! - **Implicit API**: callable operations synthesized from endpoint catalogs
//! - **Execution math**: exact `Decimal` VWAP over order books
//! - **Events and history**: grouped markets, candles and trades
//! - **Error normalization**: venue failures mapped once into [`Error`]
//!
//! # Example
//!
//! ```rust,no_run
//! use pmxt_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(venue: Arc<dyn Venue>) -> Result<()> {
//! let exchange = ExchangeRuntime::builder(venue).build()?;
//!
//! let first = exchange
//!     .fetch_markets_paginated(&MarketFetchParams::new().limit(50))
//!     .await?;
//! if let Some(cursor) = first.next_cursor {
//!     let second = exchange
//!         .fetch_markets_paginated(&MarketFetchParams::new().cursor(cursor).limit(50))
//!         .await?;
//!     println!("{} of {}", second.data.len(), second.total);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]

// Re-exports of external dependencies
pub use rust_decimal;
pub use serde;
pub use serde_json;

pub mod auth;
pub mod capability;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exchange;
pub mod execution;
pub mod filter;
pub mod implicit_api;
pub mod logging;
pub mod pagination;
pub mod runtime;
pub mod time;
pub mod transport;
pub mod types;
pub mod venue;

pub use capability::{Capabilities, ExchangeCapabilities, Support};
pub use credentials::{Credentials, SecretString};
pub use error::{ContextExt, Error, ErrorKind, RawError, RawResult, Result};
pub use exchange::{ArcExchange, BoxedExchange, Exchange, ExchangeExt};
pub use runtime::{ExchangeRuntime, RuntimeConfig};
pub use types::{
    ApiDescriptor, EndpointDescriptor, EventFetchParams, HttpMethod, MarketFetchParams,
    MarketOutcome, OrderBook, OrderLevel, OrderSide, PaginatedMarketsResult, UnifiedEvent,
    UnifiedMarket,
};
pub use venue::Venue;

/// Prelude module for convenient imports
///
/// ```rust
/// use pmxt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{ApiKeySigner, AuthScheme, Signer};
    pub use crate::capability::{Capabilities, ExchangeCapabilities, Support};
    pub use crate::credentials::{Credentials, SecretString};
    pub use crate::error::{
        ContextExt, DefaultErrorMapper, Error, ErrorKind, ErrorMapper, RawError, RawResult, Result,
    };
    pub use crate::exchange::{ArcExchange, BoxedExchange, Exchange, ExchangeExt};
    pub use crate::execution::{ExecutionPriceResult, execution_price, execution_price_detailed};
    pub use crate::filter::{
        CountRange, DecimalRange, EventFilter, MarketFilter, SearchField, filter_events,
        filter_markets, match_market,
    };
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::runtime::{ExchangeRuntime, RuntimeConfig};
    pub use crate::transport::{HttpConfig, HttpTransport, RawResponse, RequestOptions, Transport};
    pub use crate::types::{
        ApiDescriptor, ApiParams, EndpointDescriptor, EventFetchParams, HttpMethod,
        MarketFetchParams, MarketOutcome, OhlcvParams, OrderBook, OrderLevel, OrderSide,
        OutcomeRole, PaginatedMarketsResult, PriceCandle, Trade, TradeSide, TradesParams,
        UnifiedEvent, UnifiedMarket,
    };
    pub use crate::venue::Venue;
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "pmxt-core");
    }
}
