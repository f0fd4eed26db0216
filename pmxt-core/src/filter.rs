//! Local market filtering
//!
//! Filters operate on markets and events already in hand; nothing here touches
//! a venue. Every criterion set on a [`MarketFilter`] or [`EventFilter`] must
//! hold for a record to pass.
//!
//! ```rust
//! use pmxt_core::filter::{DecimalRange, MarketFilter, filter_markets};
//! use pmxt_core::types::UnifiedMarket;
//! use rust_decimal_macros::dec;
//!
//! let mut a = UnifiedMarket::new("a", "Will it rain in Paris?", vec![]);
//! a.volume_24h = dec!(5000);
//! let mut b = UnifiedMarket::new("b", "Will it rain in Rome?", vec![]);
//! b.volume_24h = dec!(10);
//!
//! let filter = MarketFilter::new()
//!     .text("rain")
//!     .volume_24h(DecimalRange::at_least(dec!(1000)));
//! let hits = filter_markets(&[a, b], &filter);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].market_id, "a");
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{OutcomeRole, UnifiedEvent, UnifiedMarket};

const TITLE_PREVIEW_CHARS: usize = 70;

/// Field a text query can be matched against.
///
/// `Outcomes` only applies to markets; an event never matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Market title
    Title,
    /// Long description
    Description,
    /// Category
    Category,
    /// Any tag
    Tags,
    /// Any outcome label
    Outcomes,
}

/// Inclusive numeric bounds. Unset bounds don't constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalRange {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl DecimalRange {
    /// Both bounds.
    pub const fn between(min: Decimal, max: Decimal) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Lower bound only.
    pub const fn at_least(min: Decimal) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Upper bound only.
    pub const fn at_most(max: Decimal) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: Decimal) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Inclusive bounds on a count. Unset bounds don't constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl CountRange {
    /// Both bounds.
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: usize) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Exclusive date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Strictly before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime<Utc>>,
    /// Strictly after
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whether `value` lies strictly inside the bounds.
    pub fn contains(&self, value: DateTime<Utc>) -> bool {
        self.before.is_none_or(|b| value < b) && self.after.is_none_or(|a| value > a)
    }
}

/// Numeric bounds applied to one outcome of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRange {
    /// Which outcome
    pub outcome: OutcomeRole,
    /// Bounds on the outcome's value
    #[serde(flatten)]
    pub range: DecimalRange,
}

/// Criteria for [`filter_markets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketFilter {
    /// Case-insensitive substring
    pub text: Option<String>,
    /// Fields `text` is matched against; title when empty
    pub search_in: Vec<SearchField>,
    /// Exact category
    pub category: Option<String>,
    /// Matches if the market carries any of these tags (case-insensitive)
    pub tags: Vec<String>,
    /// 24h volume bounds
    pub volume_24h: Option<DecimalRange>,
    /// Lifetime volume bounds; missing volume counts as 0
    pub volume: Option<DecimalRange>,
    /// Liquidity bounds
    pub liquidity: Option<DecimalRange>,
    /// Open interest bounds; missing open interest counts as 0
    pub open_interest: Option<DecimalRange>,
    /// Resolution date bounds; markets without a date never pass
    pub resolution_date: Option<DateRange>,
    /// Price bounds on one outcome
    pub price: Option<OutcomeRange>,
    /// 24h price change bounds on one outcome
    pub price_change_24h: Option<OutcomeRange>,
}

impl MarketFilter {
    /// A filter that lets everything through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text query.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Fields searched by the text query.
    pub fn search_in(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.search_in = fields.into_iter().collect();
        self
    }

    /// Exact category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Any-of tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// 24h volume bounds.
    pub fn volume_24h(mut self, range: DecimalRange) -> Self {
        self.volume_24h = Some(range);
        self
    }

    /// Lifetime volume bounds.
    pub fn volume(mut self, range: DecimalRange) -> Self {
        self.volume = Some(range);
        self
    }

    /// Liquidity bounds.
    pub fn liquidity(mut self, range: DecimalRange) -> Self {
        self.liquidity = Some(range);
        self
    }

    /// Open interest bounds.
    pub fn open_interest(mut self, range: DecimalRange) -> Self {
        self.open_interest = Some(range);
        self
    }

    /// Resolution date bounds.
    pub fn resolution_date(mut self, range: DateRange) -> Self {
        self.resolution_date = Some(range);
        self
    }

    /// Price bounds on `outcome`.
    pub fn price(mut self, outcome: OutcomeRole, range: DecimalRange) -> Self {
        self.price = Some(OutcomeRange { outcome, range });
        self
    }

    /// 24h price change bounds on `outcome`.
    pub fn price_change_24h(mut self, outcome: OutcomeRole, range: DecimalRange) -> Self {
        self.price_change_24h = Some(OutcomeRange { outcome, range });
        self
    }

    /// Whether `market` satisfies every criterion.
    pub fn matches(&self, market: &UnifiedMarket) -> bool {
        if let Some(text) = &self.text {
            let fields = if self.search_in.is_empty() {
                &[SearchField::Title][..]
            } else {
                &self.search_in[..]
            };
            if !text_matches(market, &text.to_lowercase(), fields) {
                return false;
            }
        }

        if let Some(category) = &self.category
            && market.category.as_ref() != Some(category)
        {
            return false;
        }

        if !self.tags.is_empty() && !has_any_tag(market.tags.as_deref(), &self.tags) {
            return false;
        }

        let ranges = [
            (self.volume_24h, market.volume_24h),
            (self.volume, market.volume.unwrap_or_default()),
            (self.liquidity, market.liquidity),
            (self.open_interest, market.open_interest.unwrap_or_default()),
        ];
        if ranges
            .iter()
            .any(|(range, value)| range.is_some_and(|r| !r.contains(*value)))
        {
            return false;
        }

        if let Some(dates) = &self.resolution_date {
            match market.resolution_date {
                Some(date) if dates.contains(date) => {}
                _ => return false,
            }
        }

        if let Some(f) = &self.price {
            match market.outcome(f.outcome) {
                Some(outcome) if f.range.contains(outcome.price) => {}
                _ => return false,
            }
        }

        if let Some(f) = &self.price_change_24h {
            match market.outcome(f.outcome).and_then(|o| o.price_change_24h) {
                Some(change) if f.range.contains(change) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Criteria for [`filter_events`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventFilter {
    /// Case-insensitive substring
    pub text: Option<String>,
    /// Fields `text` is matched against; title when empty
    pub search_in: Vec<SearchField>,
    /// Exact category
    pub category: Option<String>,
    /// Matches if the event carries any of these tags (case-insensitive)
    pub tags: Vec<String>,
    /// Bounds on the number of markets in the event
    pub market_count: Option<CountRange>,
    /// Bounds on the summed 24h volume of the event's markets
    pub total_volume: Option<DecimalRange>,
}

impl EventFilter {
    /// A filter that lets everything through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text query.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Fields searched by the text query.
    pub fn search_in(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.search_in = fields.into_iter().collect();
        self
    }

    /// Exact category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Any-of tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Market count bounds.
    pub fn market_count(mut self, range: CountRange) -> Self {
        self.market_count = Some(range);
        self
    }

    /// Total 24h volume bounds.
    pub fn total_volume(mut self, range: DecimalRange) -> Self {
        self.total_volume = Some(range);
        self
    }

    /// Whether `event` satisfies every criterion.
    pub fn matches(&self, event: &UnifiedEvent) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = |s: &str| s.to_lowercase().contains(&needle);
            let fields = if self.search_in.is_empty() {
                &[SearchField::Title][..]
            } else {
                &self.search_in[..]
            };
            let found = fields.iter().any(|field| match field {
                SearchField::Title => hit(event.title.as_str()),
                SearchField::Description => hit(event.description.as_str()),
                SearchField::Category => event.category.as_deref().is_some_and(hit),
                SearchField::Tags => event.tags.iter().flatten().any(|t| hit(t.as_str())),
                SearchField::Outcomes => false,
            });
            if !found {
                return false;
            }
        }

        if let Some(category) = &self.category
            && event.category.as_ref() != Some(category)
        {
            return false;
        }

        if !self.tags.is_empty() && !has_any_tag(event.tags.as_deref(), &self.tags) {
            return false;
        }

        if let Some(range) = &self.market_count
            && !range.contains(event.markets.len())
        {
            return false;
        }

        if let Some(range) = &self.total_volume
            && !range.contains(event.total_volume_24h())
        {
            return false;
        }

        true
    }
}

fn has_any_tag(carried: Option<&[String]>, wanted: &[String]) -> bool {
    carried.is_some_and(|carried| {
        wanted
            .iter()
            .any(|w| carried.iter().any(|t| t.eq_ignore_ascii_case(w)))
    })
}

fn text_matches(market: &UnifiedMarket, needle: &str, fields: &[SearchField]) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    fields.iter().any(|field| match field {
        SearchField::Title => hit(market.title.as_str()),
        SearchField::Description => hit(market.description.as_str()),
        SearchField::Category => market.category.as_deref().is_some_and(hit),
        SearchField::Tags => market.tags.iter().flatten().any(|t| hit(t.as_str())),
        SearchField::Outcomes => market.outcomes.iter().any(|o| hit(o.label.as_str())),
    })
}

/// Markets that satisfy `filter`, in input order.
pub fn filter_markets(markets: &[UnifiedMarket], filter: &MarketFilter) -> Vec<UnifiedMarket> {
    filter_by(markets, |m| filter.matches(m))
}

/// Markets for which `predicate` holds, in input order.
pub fn filter_by<F>(markets: &[UnifiedMarket], predicate: F) -> Vec<UnifiedMarket>
where
    F: Fn(&UnifiedMarket) -> bool,
{
    markets.iter().filter(|m| predicate(m)).cloned().collect()
}

/// Events that satisfy `filter`, in input order.
pub fn filter_events(events: &[UnifiedEvent], filter: &EventFilter) -> Vec<UnifiedEvent> {
    events.iter().filter(|e| filter.matches(e)).cloned().collect()
}

/// The single market whose `fields` contain `query` (case-insensitive).
///
/// Fails with `NotFound` when nothing matches and with `InvalidArgument`
/// listing the candidates when more than one does.
pub fn match_market<'a>(
    markets: &'a [UnifiedMarket],
    query: &str,
    fields: &[SearchField],
) -> Result<&'a UnifiedMarket> {
    let fields = if fields.is_empty() {
        &[SearchField::Title][..]
    } else {
        fields
    };
    let needle = query.to_lowercase();
    let matches: Vec<&UnifiedMarket> = markets
        .iter()
        .filter(|m| text_matches(m, &needle, fields))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::market_not_found(query)),
        [only] => Ok(*only),
        many => {
            let titles = many
                .iter()
                .enumerate()
                .map(|(i, m)| format!("{}. {}", i + 1, preview(&m.title)))
                .collect::<Vec<_>>()
                .join("\n  ");
            Err(Error::invalid_argument(format!(
                "Multiple markets matching '{query}' ({} matches):\n  {titles}\nRefine the query.",
                many.len()
            )))
        }
    }
}

fn preview(title: &str) -> String {
    if title.chars().count() > TITLE_PREVIEW_CHARS {
        let cut: String = title.chars().take(TITLE_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::MarketOutcome;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn binary(id: &str, title: &str, yes: Decimal) -> UnifiedMarket {
        UnifiedMarket::new(
            id,
            title,
            vec![
                MarketOutcome::new(format!("{id}-y"), id, "Yes", yes),
                MarketOutcome::new(format!("{id}-n"), id, "No", dec!(1) - yes),
            ],
        )
    }

    fn markets() -> Vec<UnifiedMarket> {
        let mut a = binary("a", "Fed cuts rates in March", dec!(0.30));
        a.category = Some("Economics".into());
        a.tags = Some(vec!["Fed".into(), "Rates".into()]);
        a.volume_24h = dec!(12000);
        a.liquidity = dec!(500);
        a.resolution_date = Some(Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap());
        a.outcomes[0].price_change_24h = Some(dec!(0.05));

        let mut b = binary("b", "Bitcoin above 100k", dec!(0.70));
        b.category = Some("Crypto".into());
        b.description = "Resolves on the Fed meeting day".into();
        b.volume = Some(dec!(1000000));
        b.open_interest = Some(dec!(25000));

        let c = binary("c", "Election turnout record", dec!(0.50));
        vec![a, b, c]
    }

    fn ids(markets: &[UnifiedMarket]) -> Vec<&str> {
        markets.iter().map(|m| m.market_id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert_eq!(filter_markets(&markets(), &MarketFilter::new()).len(), 3);
    }

    #[test]
    fn test_text_defaults_to_title() {
        let hits = filter_markets(&markets(), &MarketFilter::new().text("FED"));
        assert_eq!(ids(&hits), vec!["a"]);

        let filter = MarketFilter::new()
            .text("fed")
            .search_in([SearchField::Title, SearchField::Description]);
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a", "b"]);
    }

    #[test]
    fn test_text_in_outcomes_and_tags() {
        let filter = MarketFilter::new().text("rates").search_in([SearchField::Tags]);
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a"]);

        let filter = MarketFilter::new().text("yes").search_in([SearchField::Outcomes]);
        assert_eq!(filter_markets(&markets(), &filter).len(), 3);
    }

    #[test]
    fn test_category_and_tags() {
        let hits = filter_markets(&markets(), &MarketFilter::new().category("Crypto"));
        assert_eq!(ids(&hits), vec!["b"]);

        let hits = filter_markets(&markets(), &MarketFilter::new().tags(["rates", "nope"]));
        assert_eq!(ids(&hits), vec!["a"]);
    }

    #[test]
    fn test_numeric_ranges_treat_missing_as_zero() {
        let filter = MarketFilter::new().volume(DecimalRange::at_most(dec!(0)));
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a", "c"]);

        let filter = MarketFilter::new().open_interest(DecimalRange::at_least(dec!(1)));
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["b"]);

        let filter = MarketFilter::new().volume_24h(DecimalRange::between(dec!(1), dec!(12000)));
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a"]);
    }

    #[test]
    fn test_resolution_date_is_exclusive_and_requires_date() {
        let at = Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap();
        let filter = MarketFilter::new().resolution_date(DateRange {
            before: Some(at),
            after: None,
        });
        assert!(filter_markets(&markets(), &filter).is_empty());

        let filter = MarketFilter::new().resolution_date(DateRange {
            before: Some(at + chrono::Duration::days(1)),
            after: None,
        });
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a"]);
    }

    #[test]
    fn test_outcome_price_filters() {
        let filter = MarketFilter::new().price(OutcomeRole::Yes, DecimalRange::at_least(dec!(0.5)));
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["b", "c"]);

        let filter = MarketFilter::new().price(OutcomeRole::Up, DecimalRange::default());
        assert!(filter_markets(&markets(), &filter).is_empty());

        let filter = MarketFilter::new()
            .price_change_24h(OutcomeRole::Yes, DecimalRange::at_least(dec!(0)));
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a"]);
    }

    #[test]
    fn test_filter_by_predicate() {
        let hits = filter_by(&markets(), |m| m.yes().is_some_and(|o| o.price > dec!(0.4)));
        assert_eq!(ids(&hits), vec!["b", "c"]);
    }

    #[test]
    fn test_filter_deserializes_from_camel_case() {
        let filter: MarketFilter = serde_json::from_str(
            r#"{"text":"fed","searchIn":["title"],"volume24h":{"min":"100"},
                "price":{"outcome":"yes","max":"0.5"}}"#,
        )
        .unwrap();
        assert_eq!(ids(&filter_markets(&markets(), &filter)), vec!["a"]);
    }

    #[test]
    fn test_match_market() {
        let all = markets();
        assert_eq!(match_market(&all, "bitcoin", &[]).unwrap().market_id, "b");

        let err = match_market(&all, "nothing", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = match_market(&all, "e", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("3 matches"));
    }

    fn events() -> Vec<UnifiedEvent> {
        let all = markets();
        let mut fed = UnifiedEvent::new("fed", "FOMC March meeting", vec![all[0].clone()]);
        fed.category = Some("Economics".into());
        fed.tags = Some(vec!["Fed".into()]);
        fed.description = "Rate decision".into();

        let mut crypto = UnifiedEvent::new("btc", "Bitcoin price", vec![all[1].clone(), all[2].clone()]);
        crypto.category = Some("Crypto".into());
        crypto.markets[0].volume_24h = dec!(300);
        crypto.markets[1].volume_24h = dec!(200);

        let empty = UnifiedEvent::new("none", "Placeholder", vec![]);
        vec![fed, crypto, empty]
    }

    fn event_ids(events: &[UnifiedEvent]) -> Vec<&str> {
        events.iter().map(|e| e.event_id.as_str()).collect()
    }

    #[test]
    fn test_event_text_search_fields() {
        let hits = filter_events(&events(), &EventFilter::new().text("BITCOIN"));
        assert_eq!(event_ids(&hits), vec!["btc"]);

        let hits = filter_events(&events(), &EventFilter::new().text("rate"));
        assert!(hits.is_empty());

        let filter = EventFilter::new()
            .text("rate")
            .search_in([SearchField::Description, SearchField::Tags]);
        assert_eq!(event_ids(&filter_events(&events(), &filter)), vec!["fed"]);

        let filter = EventFilter::new().text("yes").search_in([SearchField::Outcomes]);
        assert!(filter_events(&events(), &filter).is_empty());
    }

    #[test]
    fn test_event_category_and_tags() {
        let hits = filter_events(&events(), &EventFilter::new().category("Crypto"));
        assert_eq!(event_ids(&hits), vec!["btc"]);

        let hits = filter_events(&events(), &EventFilter::new().tags(["FED"]));
        assert_eq!(event_ids(&hits), vec!["fed"]);
    }

    #[test]
    fn test_event_market_count_and_total_volume() {
        let filter = EventFilter::new().market_count(CountRange::between(1, 1));
        assert_eq!(event_ids(&filter_events(&events(), &filter)), vec!["fed"]);

        let filter = EventFilter::new().market_count(CountRange { min: None, max: Some(0) });
        assert_eq!(event_ids(&filter_events(&events(), &filter)), vec!["none"]);

        let filter = EventFilter::new().total_volume(DecimalRange::between(dec!(500), dec!(500)));
        assert_eq!(event_ids(&filter_events(&events(), &filter)), vec!["btc"]);

        let filter = EventFilter::new().total_volume(DecimalRange::at_most(dec!(0)));
        assert_eq!(event_ids(&filter_events(&events(), &filter)), vec!["none"]);
    }

    #[test]
    fn test_event_filter_deserializes_from_camel_case() {
        let filter: EventFilter = serde_json::from_str(
            r#"{"category":"Crypto","marketCount":{"min":2},"totalVolume":{"min":"100"}}"#,
        )
        .unwrap();
        assert_eq!(event_ids(&filter_events(&events(), &filter)), vec!["btc"]);
    }
}
