//! Parameter types for listing and lookup calls.
//!
//! Parameters use the builder pattern:
//!
//! ```rust
//! use pmxt_core::types::params::{MarketFetchParams, MarketSort};
//!
//! let params = MarketFetchParams::new()
//!     .query("Fed")
//!     .sort(MarketSort::Volume)
//!     .limit(20);
//!
//! assert!(params.has_pagination());
//! assert!(params.has_lookup_criteria());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form parameters for implicit API calls, keyed by parameter name.
pub type ApiParams = BTreeMap<String, Value>;

/// Market lifecycle filter understood by venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Open for trading
    #[default]
    Active,
    /// Closed or resolved
    Closed,
    /// Everything
    All,
}

/// Sort order requested from the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSort {
    /// 24h volume, descending
    Volume,
    /// Liquidity, descending
    Liquidity,
    /// Newest first
    Newest,
}

/// Where a text query is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchIn {
    /// Title only
    #[default]
    Title,
    /// Description only
    Description,
    /// Title and description
    Both,
}

/// Parameters for `fetch_markets`, `fetch_markets_paginated` and `fetch_market`.
///
/// Lookup criteria (`market_id`, `outcome_id`, `event_id`, `slug`, `query`) narrow
/// the result set. Pagination fields (`limit`, `offset`, `cursor`) are consumed by
/// the runtime and stripped before the venue listing is called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFetchParams {
    /// Direct lookup by market id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<String>,
    /// Reverse lookup by outcome id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_id: Option<String>,
    /// Markets belonging to an event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Lookup by slug or ticker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Keyword search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Start offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Opaque continuation token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Lifecycle filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MarketStatus>,
    /// Sort order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<MarketSort>,
    /// Query scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_in: Option<SearchIn>,
    /// Venue-specific extras passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MarketFetchParams {
    /// Empty parameters: fetch everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup by market id.
    pub fn market_id(mut self, id: impl Into<String>) -> Self {
        self.market_id = Some(id.into());
        self
    }

    /// Lookup by outcome id.
    pub fn outcome_id(mut self, id: impl Into<String>) -> Self {
        self.outcome_id = Some(id.into());
        self
    }

    /// Restrict to an event.
    pub fn event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    /// Lookup by slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Keyword search.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Continuation token from a previous page.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Lifecycle filter.
    pub fn status(mut self, status: MarketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sort order.
    pub fn sort(mut self, sort: MarketSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Query scope.
    pub fn search_in(mut self, search_in: SearchIn) -> Self {
        self.search_in = Some(search_in);
        self
    }

    /// Venue-specific extra parameter.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether `limit` or `offset` was given.
    pub fn has_pagination(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    /// Whether the call narrows or reorders the listing.
    pub fn has_lookup_criteria(&self) -> bool {
        self.market_id.is_some()
            || self.outcome_id.is_some()
            || self.event_id.is_some()
            || self.slug.is_some()
            || self.query.is_some()
            || self.status.is_some()
            || self.search_in.is_some()
            || self.sort.is_some()
            || !self.extra.is_empty()
    }

    /// Copy with `limit`, `offset` and `cursor` removed.
    pub fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            cursor: None,
            ..self.clone()
        }
    }

    /// Most specific identifier in the lookup criteria, used in not-found errors.
    ///
    /// Priority: market id, slug, outcome id, event id, query, then `"unknown"`.
    pub fn lookup_identifier(&self) -> &str {
        self.market_id
            .as_deref()
            .or(self.slug.as_deref())
            .or(self.outcome_id.as_deref())
            .or(self.event_id.as_deref())
            .or(self.query.as_deref())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_pagination_keeps_criteria() {
        let params = MarketFetchParams::new()
            .query("rain")
            .limit(10)
            .offset(20)
            .cursor("abc")
            .extra("tag", "weather");
        let stripped = params.without_pagination();
        assert_eq!(stripped.query.as_deref(), Some("rain"));
        assert_eq!(stripped.extra.get("tag"), Some(&Value::from("weather")));
        assert!(stripped.limit.is_none());
        assert!(stripped.offset.is_none());
        assert!(stripped.cursor.is_none());
        assert!(!stripped.has_pagination());
    }

    #[test]
    fn test_lookup_criteria_ignores_pagination() {
        assert!(!MarketFetchParams::new().has_lookup_criteria());
        assert!(!MarketFetchParams::new().limit(5).offset(2).has_lookup_criteria());
        assert!(MarketFetchParams::new().sort(MarketSort::Volume).has_lookup_criteria());
        assert!(MarketFetchParams::new().slug("x").has_lookup_criteria());
        assert!(MarketFetchParams::new().extra("k", 1).has_lookup_criteria());
    }

    #[test]
    fn test_lookup_identifier_priority() {
        let all = MarketFetchParams::new()
            .query("q")
            .event_id("e")
            .outcome_id("o")
            .slug("s")
            .market_id("m");
        assert_eq!(all.lookup_identifier(), "m");
        assert_eq!(MarketFetchParams::new().slug("s").query("q").lookup_identifier(), "s");
        assert_eq!(
            MarketFetchParams::new().event_id("e").query("q").lookup_identifier(),
            "e"
        );
        assert_eq!(MarketFetchParams::new().query("q").lookup_identifier(), "q");
        assert_eq!(MarketFetchParams::new().lookup_identifier(), "unknown");
    }

    #[test]
    fn test_serializes_camel_case_with_flattened_extras() {
        let params = MarketFetchParams::new()
            .market_id("42")
            .search_in(SearchIn::Both)
            .extra("closed", false);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"marketId": "42", "searchIn": "both", "closed": false})
        );
    }
}
