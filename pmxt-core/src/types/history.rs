//! Price history and trade types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Timestamp;
use crate::error::{Error, Result};

/// One OHLCV candle for an outcome. Prices are 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCandle {
    /// Candle open time (ms)
    pub timestamp: Timestamp,
    /// Opening price
    pub open: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Traded volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

/// Aggressor side of a historical trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Buyer initiated
    Buy,
    /// Seller initiated
    Sell,
    /// Not reported by the venue
    #[default]
    Unknown,
}

/// A historical trade on one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade id
    pub id: String,
    /// Execution time (ms)
    pub timestamp: Timestamp,
    /// Price, 0.0 to 1.0
    pub price: Decimal,
    /// Contracts traded
    pub amount: Decimal,
    /// Aggressor side
    #[serde(default)]
    pub side: TradeSide,
}

/// Parameters for `fetch_ohlcv`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvParams {
    /// Candle width, e.g. `"1h"` or `"1d"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Maximum number of candles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Window start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Window end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Venue-specific extras passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl OhlcvParams {
    /// No constraints: the venue's default window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Candle width.
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Maximum number of candles.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Window bounds.
    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Rejects a zero limit and an empty or inverted window.
    pub fn validate(&self) -> Result<()> {
        if self.limit == Some(0) {
            return Err(Error::invalid_argument("limit must be greater than 0"));
        }
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start >= end
        {
            return Err(Error::invalid_argument("start must be before end"));
        }
        Ok(())
    }
}

/// Parameters for `fetch_trades`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesParams {
    /// Maximum number of trades
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Only trades at or after this time (ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<Timestamp>,
    /// Venue-specific extras passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TradesParams {
    /// No constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of trades.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Lower time bound (ms).
    pub fn since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    /// Rejects a zero limit.
    pub fn validate(&self) -> Result<()> {
        if self.limit == Some(0) {
            return Err(Error::invalid_argument("limit must be greater than 0"));
        }
        Ok(())
    }
}
