//! # pmxt-rust
//!
//! One polymorphic surface over prediction-market venues. Each venue adapter
//! maps its own REST dialect into unified markets and order books; the
//! [`ExchangeRuntime`] from `pmxt-core` supplies market caching, stable cursor
//! pagination, catalog-driven endpoint calls and execution price math.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pmxt_rust::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run(venue: Arc<dyn Venue>) -> Result<()> {
//! try_init_logging(&LogConfig::default());
//!
//! let exchange: ArcExchange = Arc::new(ExchangeRuntime::builder(venue).build()?);
//! let market = exchange
//!     .fetch_market(&MarketFetchParams::new().query("fed rates"))
//!     .await?;
//! if let Some(yes) = market.yes() {
//!     let book = exchange.fetch_order_book(&yes.outcome_id).await?;
//!     let fill = exchange.get_execution_price_detailed(&book, OrderSide::Buy, Decimal::from(250))?;
//!     println!("{} @ {} (filled {})", market.title, fill.price, fill.filled_amount);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub use pmxt_core;
pub use pmxt_core::{
    ArcExchange, BoxedExchange, Error, ErrorKind, Exchange, ExchangeExt, ExchangeRuntime, Result,
    RuntimeConfig, Venue,
    types::*,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use pmxt_core::prelude::*;
}
