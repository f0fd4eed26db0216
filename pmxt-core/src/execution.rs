//! Execution price simulation
//!
//! Walks an [`OrderBook`] the way a market order would and reports the
//! volume-weighted average fill price. All arithmetic is exact `Decimal`.
//!
//! ```rust
//! use pmxt_core::execution::{execution_price, execution_price_detailed};
//! use pmxt_core::types::{OrderBook, OrderLevel, OrderSide};
//! use rust_decimal_macros::dec;
//!
//! let book = OrderBook::new(
//!     vec![OrderLevel::new(dec!(0.48), dec!(100))],
//!     vec![
//!         OrderLevel::new(dec!(0.50), dec!(10)),
//!         OrderLevel::new(dec!(0.60), dec!(10)),
//!     ],
//! );
//!
//! // 10 @ 0.50 + 5 @ 0.60
//! let price = execution_price(&book, OrderSide::Buy, dec!(15)).unwrap();
//! assert_eq!(price.round_dp(6), dec!(0.533333));
//!
//! // Not enough depth: the simple variant answers 0, the detailed one reports the partial fill.
//! assert_eq!(execution_price(&book, OrderSide::Buy, dec!(25)).unwrap(), dec!(0));
//! let detail = execution_price_detailed(&book, OrderSide::Buy, dec!(25)).unwrap();
//! assert_eq!(detail.filled_amount, dec!(20));
//! assert!(!detail.fully_filled);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{OrderBook, OrderSide};

/// Outcome of a simulated fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPriceResult {
    /// Volume-weighted price over what was filled, 0 when nothing was
    pub price: Decimal,
    /// Quantity matched
    pub filled_amount: Decimal,
    /// Whether the full requested amount was matched
    pub fully_filled: bool,
}

impl ExecutionPriceResult {
    /// Nothing filled.
    pub const fn empty() -> Self {
        Self {
            price: Decimal::ZERO,
            filled_amount: Decimal::ZERO,
            fully_filled: false,
        }
    }
}

/// Simulates a fill of `amount` and reports price, filled quantity and completeness.
///
/// Buys consume asks from the lowest price up, sells consume bids from the
/// highest price down. Levels with a non-positive size are skipped.
pub fn execution_price_detailed(
    book: &OrderBook,
    side: OrderSide,
    amount: Decimal,
) -> Result<ExecutionPriceResult> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_argument(format!(
            "Amount must be greater than 0, got {amount}"
        )));
    }

    let mut remaining = amount;
    let mut cost = Decimal::ZERO;
    let mut filled = Decimal::ZERO;

    for level in book.levels_for(side) {
        if remaining.is_zero() {
            break;
        }
        if level.size <= Decimal::ZERO {
            continue;
        }
        let fill = remaining.min(level.size);
        cost += fill * level.price;
        filled += fill;
        remaining -= fill;
    }

    if filled.is_zero() {
        return Ok(ExecutionPriceResult::empty());
    }

    Ok(ExecutionPriceResult {
        price: cost / filled,
        filled_amount: filled,
        fully_filled: remaining.is_zero(),
    })
}

/// Average fill price for `amount`, or 0 when the book is too thin to fill it.
pub fn execution_price(book: &OrderBook, side: OrderSide, amount: Decimal) -> Result<Decimal> {
    let result = execution_price_detailed(book, side, amount)?;
    Ok(if result.fully_filled {
        result.price
    } else {
        Decimal::ZERO
    })
}
