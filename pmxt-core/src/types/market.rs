//! Unified market type definitions
//!
//! A [`UnifiedMarket`] is the venue-agnostic shape every adapter maps its raw
//! listings into. The runtime treats markets as read-only values once built.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tradeable leg of a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOutcome {
    /// Outcome identifier used for order book and trading calls.
    pub outcome_id: String,
    /// Owning market.
    pub market_id: String,
    /// Human-readable label ("Yes", "Trump", "Up", ...).
    pub label: String,
    /// Current price, 0.0 to 1.0 (implied probability).
    pub price: Decimal,
    /// 24-hour price change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<Decimal>,
    /// Venue-specific metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl MarketOutcome {
    /// Creates an outcome without change or metadata.
    pub fn new(
        outcome_id: impl Into<String>,
        market_id: impl Into<String>,
        label: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            outcome_id: outcome_id.into(),
            market_id: market_id.into(),
            label: label.into(),
            price,
            price_change_24h: None,
            metadata: None,
        }
    }
}

/// Conventional roles an outcome can play in a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeRole {
    /// "Yes" leg
    Yes,
    /// "No" leg
    No,
    /// "Up" leg
    Up,
    /// "Down" leg
    Down,
}

impl OutcomeRole {
    /// Label the role is matched against (case-insensitive).
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for OutcomeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A market as seen through the unified API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedMarket {
    /// Identifier, unique within a venue.
    pub market_id: String,
    /// Market title / question.
    pub title: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Human-friendly slug or ticker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Outcomes in venue order.
    pub outcomes: Vec<MarketOutcome>,
    /// Expected resolution date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_date: Option<DateTime<Utc>>,
    /// 24-hour traded volume (USD).
    #[serde(rename = "volume24h")]
    pub volume_24h: Decimal,
    /// Lifetime traded volume (USD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    /// Current liquidity (USD).
    pub liquidity: Decimal,
    /// Open interest (USD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<Decimal>,
    /// Link to the market on the venue.
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

impl UnifiedMarket {
    /// Creates a market with the required fields; optional fields start empty.
    pub fn new(
        market_id: impl Into<String>,
        title: impl Into<String>,
        outcomes: Vec<MarketOutcome>,
    ) -> Self {
        Self {
            market_id: market_id.into(),
            title: title.into(),
            description: String::new(),
            slug: None,
            outcomes,
            resolution_date: None,
            volume_24h: Decimal::ZERO,
            volume: None,
            liquidity: Decimal::ZERO,
            open_interest: None,
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

    /// Alias for the title, matching venues that call it a question.
    pub fn question(&self) -> &str {
        &self.title
    }

    /// Finds the outcome whose label matches `role`, ignoring case.
    pub fn outcome(&self, role: OutcomeRole) -> Option<&MarketOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.label.trim().eq_ignore_ascii_case(role.label()))
    }

    /// The "Yes" outcome of a binary market.
    pub fn yes(&self) -> Option<&MarketOutcome> {
        self.outcome(OutcomeRole::Yes)
    }

    /// The "No" outcome of a binary market.
    pub fn no(&self) -> Option<&MarketOutcome> {
        self.outcome(OutcomeRole::No)
    }

    /// The "Up" outcome of a binary market.
    pub fn up(&self) -> Option<&MarketOutcome> {
        self.outcome(OutcomeRole::Up)
    }

    /// The "Down" outcome of a binary market.
    pub fn down(&self) -> Option<&MarketOutcome> {
        self.outcome(OutcomeRole::Down)
    }

    /// Looks up an outcome by its identifier.
    pub fn outcome_by_id(&self, outcome_id: &str) -> Option<&MarketOutcome> {
        self.outcomes.iter().find(|o| o.outcome_id == outcome_id)
    }
}
