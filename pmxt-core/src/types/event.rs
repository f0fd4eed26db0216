//! Event type definitions
//!
//! An event groups related markets, e.g. every bracket of one election.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::market::UnifiedMarket;

/// A group of related markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedEvent {
    /// Identifier, unique within a venue.
    pub event_id: String,
    /// Event title.
    pub title: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Human-friendly slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Markets in this event.
    #[serde(default)]
    pub markets: Vec<UnifiedMarket>,
    /// Link to the event on the venue.
    #[serde(default)]
    pub url: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl UnifiedEvent {
    /// Creates an event with the required fields; optional fields start empty.
    pub fn new(
        event_id: impl Into<String>,
        title: impl Into<String>,
        markets: Vec<UnifiedMarket>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            title: title.into(),
            description: String::new(),
            slug: None,
            markets,
            url: String::new(),
            image: None,
            category: None,
            tags: None,
        }
    }

    /// Sets the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Sum of the 24h volume of every market in the event.
    pub fn total_volume_24h(&self) -> Decimal {
        self.markets.iter().map(|m| m.volume_24h).sum()
    }

    /// A market of this event, by id.
    pub fn market(&self, market_id: &str) -> Option<&UnifiedMarket> {
        self.markets.iter().find(|m| m.market_id == market_id)
    }
}

/// Parameters for `fetch_events` and `fetch_event`.
///
/// `limit` and `offset` are applied by the runtime; the venue receives the
/// lookup criteria only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFetchParams {
    /// Direct lookup by event id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Lookup by slug
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
    /// Venue-specific extras passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EventFetchParams {
    /// Empty parameters: fetch everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup by event id.
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

    /// Venue-specific extra parameter.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Copy with `limit` and `offset` removed.
    pub fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self.clone()
        }
    }

    /// Most specific identifier in the lookup criteria, used in not-found errors.
    ///
    /// Priority: event id, slug, query, then `"unknown"`.
    pub fn lookup_identifier(&self) -> &str {
        self.event_id
            .as_deref()
            .or(self.slug.as_deref())
            .or(self.query.as_deref())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookup_identifier_priority() {
        let all = EventFetchParams::new().query("q").slug("s").event_id("e");
        assert_eq!(all.lookup_identifier(), "e");
        assert_eq!(EventFetchParams::new().query("q").slug("s").lookup_identifier(), "s");
        assert_eq!(EventFetchParams::new().query("q").lookup_identifier(), "q");
        assert_eq!(EventFetchParams::new().limit(3).lookup_identifier(), "unknown");
    }

    #[test]
    fn test_total_volume_sums_markets() {
        let mut a = UnifiedMarket::new("a", "A", vec![]);
        a.volume_24h = dec!(100.5);
        let mut b = UnifiedMarket::new("b", "B", vec![]);
        b.volume_24h = dec!(20);
        let event = UnifiedEvent::new("e", "Election", vec![a, b]);
        assert_eq!(event.total_volume_24h(), dec!(120.5));
        assert_eq!(event.market("b").map(|m| m.title.as_str()), Some("B"));
        assert_eq!(UnifiedEvent::new("x", "Empty", vec![]).total_volume_24h(), dec!(0));
    }

    #[test]
    fn test_event_deserializes_camel_case() {
        let event: UnifiedEvent = serde_json::from_value(serde_json::json!({
            "eventId": "pres-2028",
            "title": "Presidential election",
            "slug": "pres",
            "tags": ["Politics"]
        }))
        .unwrap();
        assert_eq!(event.event_id, "pres-2028");
        assert!(event.markets.is_empty());
        assert_eq!(event.slug.as_deref(), Some("pres"));
    }
}
