//! Order book type definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a simulated fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy, consumes asks
    Buy,
    /// Sell, consumes bids
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A single price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLevel {
    /// Price, 0.0 to 1.0
    pub price: Decimal,
    /// Contracts available at this price
    pub size: Decimal,
}

impl OrderLevel {
    /// Create a new level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Order book for a single outcome.
///
/// `bids` are ordered by price descending and `asks` ascending. Venue adapters
/// are expected to deliver them that way; [`OrderBook::normalize`] restores the
/// ordering when they don't.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Bid levels, best (highest) first
    pub bids: Vec<OrderLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<OrderLevel>,
    /// Snapshot time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl OrderBook {
    /// Create a book from raw levels, sorting both sides.
    pub fn new(bids: Vec<OrderLevel>, asks: Vec<OrderLevel>) -> Self {
        let mut book = Self {
            bids,
            asks,
            timestamp: None,
        };
        book.normalize();
        book
    }

    /// Sort bids descending and asks ascending by price.
    pub fn normalize(&mut self) {
        self.bids.sort_by(|a, b| b.price.cmp(&a.price));
        self.asks.sort_by(|a, b| a.price.cmp(&b.price));
    }

    /// Levels consumed by an order on `side`.
    pub fn levels_for(&self, side: OrderSide) -> &[OrderLevel] {
        match side {
            OrderSide::Buy => &self.asks,
            OrderSide::Sell => &self.bids,
        }
    }

    /// Best bid
    pub fn best_bid(&self) -> Option<&OrderLevel> {
        self.bids.first()
    }

    /// Best ask
    pub fn best_ask(&self) -> Option<&OrderLevel> {
        self.asks.first()
    }

    /// Spread between best ask and best bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Total size on one side.
    pub fn depth(&self, side: OrderSide) -> Decimal {
        self.levels_for(side)
            .iter()
            .filter(|l| l.size > Decimal::ZERO)
            .map(|l| l.size)
            .sum()
    }
}
