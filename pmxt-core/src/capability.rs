//! Feature discovery
//!
//! Every exchange reports which unified operations it offers. A feature is
//! either served by the venue itself (`Native`), synthesized by the runtime on
//! top of other venue calls (`Emulated`), or not available at all.
//!
//! ```rust
//! use pmxt_core::capability::{Capabilities, ExchangeCapabilities, Support};
//!
//! let caps = ExchangeCapabilities::new(Capabilities::FETCH_MARKETS | Capabilities::FETCH_ORDER_BOOK)
//!     .with_emulated(Capabilities::FETCH_MARKETS_PAGINATED);
//!
//! assert_eq!(caps.has("fetchMarkets"), Support::Native);
//! assert_eq!(caps.has("fetchMarketsPaginated"), Support::Emulated);
//! assert_eq!(caps.has("createOrder"), Support::Unsupported);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Set of unified operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        const FETCH_MARKETS           = 1 << 0;
        const FETCH_MARKET            = 1 << 1;
        const FETCH_MARKETS_PAGINATED = 1 << 2;
        const LOAD_MARKETS            = 1 << 3;
        const FETCH_ORDER_BOOK        = 1 << 4;
        const CALL_API                = 1 << 5;
        const EXECUTION_PRICE         = 1 << 6;
        const FILTER_MARKETS          = 1 << 7;
        const FETCH_EVENTS            = 1 << 8;
        const FETCH_EVENT             = 1 << 9;
        const FILTER_EVENTS           = 1 << 10;
        const FETCH_OHLCV             = 1 << 11;
        const FETCH_TRADES            = 1 << 12;

        /// Operations that need nothing but local data
        const LOCAL = Self::EXECUTION_PRICE.bits()
            | Self::FILTER_MARKETS.bits()
            | Self::FILTER_EVENTS.bits();
    }
}

/// Capability names as exposed through `has`, in declaration order.
const NAMES: &[(&str, Capabilities)] = &[
    ("fetchMarkets", Capabilities::FETCH_MARKETS),
    ("fetchMarket", Capabilities::FETCH_MARKET),
    ("fetchMarketsPaginated", Capabilities::FETCH_MARKETS_PAGINATED),
    ("loadMarkets", Capabilities::LOAD_MARKETS),
    ("fetchOrderBook", Capabilities::FETCH_ORDER_BOOK),
    ("callApi", Capabilities::CALL_API),
    ("getExecutionPrice", Capabilities::EXECUTION_PRICE),
    ("filterMarkets", Capabilities::FILTER_MARKETS),
    ("fetchEvents", Capabilities::FETCH_EVENTS),
    ("fetchEvent", Capabilities::FETCH_EVENT),
    ("filterEvents", Capabilities::FILTER_EVENTS),
    ("fetchOHLCV", Capabilities::FETCH_OHLCV),
    ("fetchTrades", Capabilities::FETCH_TRADES),
];

impl Capabilities {
    /// Looks a capability up by its camelCase feature name.
    ///
    /// Distinct from the generated `from_name`, which takes the flag's
    /// constant name (`"FETCH_MARKETS"`).
    pub fn from_feature(name: &str) -> Option<Self> {
        match name {
            // The detailed variant shares the flag with the simple one.
            "getExecutionPriceDetailed" => Some(Self::EXECUTION_PRICE),
            _ => NAMES.iter().find(|(n, _)| *n == name).map(|(_, c)| *c),
        }
    }

    /// camelCase names of every capability in the set.
    pub fn names(&self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(_, cap)| self.contains(*cap))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}

/// How a feature is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    /// Backed by a venue endpoint
    Native,
    /// Built by the runtime from other calls
    Emulated,
    /// Not available
    Unsupported,
}

impl Support {
    /// Whether the feature can be called.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Capabilities of one exchange, split by how they are provided.
///
/// A flag present in both sets counts as native.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExchangeCapabilities {
    /// Served by the venue
    pub native: Capabilities,
    /// Synthesized by the runtime
    pub emulated: Capabilities,
}

impl ExchangeCapabilities {
    /// Native capabilities only.
    pub const fn new(native: Capabilities) -> Self {
        Self {
            native,
            emulated: Capabilities::empty(),
        }
    }

    /// Adds emulated capabilities.
    pub const fn with_emulated(mut self, emulated: Capabilities) -> Self {
        self.emulated = emulated;
        self
    }

    /// Support level for a camelCase feature name. Unknown names are unsupported.
    pub fn has(&self, feature: &str) -> Support {
        match Capabilities::from_feature(feature) {
            Some(cap) => self.support(cap),
            None => Support::Unsupported,
        }
    }

    /// Support level for a flag.
    pub fn support(&self, cap: Capabilities) -> Support {
        if self.native.contains(cap) {
            Support::Native
        } else if self.emulated.contains(cap) {
            Support::Emulated
        } else {
            Support::Unsupported
        }
    }

    /// Everything callable, native or emulated.
    pub fn all(&self) -> Capabilities {
        self.native | self.emulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        assert_eq!(
            Capabilities::from_feature("fetchOrderBook"),
            Some(Capabilities::FETCH_ORDER_BOOK)
        );
        assert_eq!(
            Capabilities::from_feature("getExecutionPriceDetailed"),
            Some(Capabilities::EXECUTION_PRICE)
        );
        assert_eq!(Capabilities::from_feature("fetch_order_book"), None);
        assert_eq!(
            Capabilities::from_feature("fetchOHLCV"),
            Some(Capabilities::FETCH_OHLCV)
        );
    }

    #[test]
    fn test_feature_lookup_coexists_with_flag_names() {
        assert_eq!(
            Capabilities::from_name("FETCH_MARKETS"),
            Some(Capabilities::FETCH_MARKETS)
        );
        assert_eq!(Capabilities::from_name("fetchMarkets"), None);
        assert_eq!(
            Capabilities::from_feature("fetchMarkets"),
            Some(Capabilities::FETCH_MARKETS)
        );
        assert_eq!(Capabilities::from_feature("FETCH_MARKETS"), None);
        assert_eq!(
            ExchangeCapabilities::new(Capabilities::FETCH_EVENTS).has("fetchEvents"),
            Support::Native
        );
    }

    #[test]
    fn test_names_and_display() {
        let caps = Capabilities::FETCH_MARKETS | Capabilities::CALL_API;
        assert_eq!(caps.names(), vec!["fetchMarkets", "callApi"]);
        assert_eq!(caps.to_string(), "[fetchMarkets, callApi]");
        assert_eq!(
            Capabilities::LOCAL.names(),
            vec!["getExecutionPrice", "filterMarkets", "filterEvents"]
        );
    }

    #[test]
    fn test_native_wins_over_emulated() {
        let caps = ExchangeCapabilities::new(Capabilities::FETCH_MARKETS)
            .with_emulated(Capabilities::FETCH_MARKETS | Capabilities::LOAD_MARKETS);
        assert_eq!(caps.has("fetchMarkets"), Support::Native);
        assert_eq!(caps.has("loadMarkets"), Support::Emulated);
        assert_eq!(caps.has("nope"), Support::Unsupported);
        assert!(caps.all().contains(Capabilities::LOAD_MARKETS));
        assert!(!Support::Unsupported.is_supported());
    }

    #[test]
    fn test_support_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Support::Emulated).unwrap(),
            "\"emulated\""
        );
    }
}
