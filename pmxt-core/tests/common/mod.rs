//! In-process venue and transport doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pmxt_core::capability::{Capabilities, ExchangeCapabilities};
use pmxt_core::error::{RawError, RawResult};
use pmxt_core::transport::{RawResponse, RequestOptions, Transport};
use pmxt_core::types::{
    ApiDescriptor, EventFetchParams, HttpMethod, MarketFetchParams, MarketOutcome, OhlcvParams,
    OrderBook, PriceCandle, Trade, TradesParams, UnifiedEvent, UnifiedMarket,
};
use pmxt_core::venue::Venue;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Binary market `id` with a Yes price of `yes`.
pub fn market(id: &str, title: &str, yes: Decimal) -> UnifiedMarket {
    UnifiedMarket::new(
        id,
        title,
        vec![
            MarketOutcome::new(format!("{id}-yes"), id, "Yes", yes),
            MarketOutcome::new(format!("{id}-no"), id, "No", Decimal::ONE - yes),
        ],
    )
    .with_slug(format!("{id}-slug"))
}

/// `n` markets `m0..m{n-1}`.
pub fn markets(n: usize) -> Vec<UnifiedMarket> {
    (0..n)
        .map(|i| market(&format!("m{i}"), &format!("Market {i}"), Decimal::new(5, 1)))
        .collect()
}

pub fn ids(markets: &[UnifiedMarket]) -> Vec<String> {
    markets.iter().map(|m| m.market_id.clone()).collect()
}

/// Venue serving a mutable listing and canned order books.
#[derive(Debug, Default)]
pub struct MockVenue {
    pub listing: Mutex<Vec<UnifiedMarket>>,
    pub books: Mutex<HashMap<String, OrderBook>>,
    pub descriptors: Vec<ApiDescriptor>,
    pub fail_listing_with: Mutex<Option<u16>>,
    pub listing_delay: Option<Duration>,
    pub listing_calls: AtomicUsize,
    pub last_params: Mutex<Option<MarketFetchParams>>,
    /// `None` leaves events unsupported
    pub events: Option<Vec<UnifiedEvent>>,
    pub last_event_params: Mutex<Option<EventFetchParams>>,
    pub candles: HashMap<String, Vec<PriceCandle>>,
    pub trades: HashMap<String, Vec<Trade>>,
    pub reserved: Vec<String>,
}

impl MockVenue {
    pub fn with_markets(markets: Vec<UnifiedMarket>) -> Self {
        Self {
            listing: Mutex::new(markets),
            ..Self::default()
        }
    }

    pub fn with_events(events: Vec<UnifiedEvent>) -> Self {
        Self {
            events: Some(events),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    /// Lookup criteria are honoured the way a venue search would.
    fn matches(market: &UnifiedMarket, params: &MarketFetchParams) -> bool {
        if let Some(id) = &params.market_id
            && &market.market_id != id
        {
            return false;
        }
        if let Some(slug) = &params.slug
            && market.slug.as_ref() != Some(slug)
        {
            return false;
        }
        if let Some(outcome_id) = &params.outcome_id
            && market.outcome_by_id(outcome_id).is_none()
        {
            return false;
        }
        if let Some(query) = &params.query
            && !market.title.to_lowercase().contains(&query.to_lowercase())
        {
            return false;
        }
        true
    }
}

#[async_trait]
impl Venue for MockVenue {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Venue"
    }

    fn capabilities(&self) -> ExchangeCapabilities {
        let mut native = Capabilities::FETCH_MARKETS | Capabilities::FETCH_ORDER_BOOK;
        if self.events.is_some() {
            native |= Capabilities::FETCH_EVENTS;
        }
        ExchangeCapabilities::new(native)
    }

    fn api_descriptors(&self) -> Vec<ApiDescriptor> {
        self.descriptors.clone()
    }

    fn reserved_operations(&self) -> Vec<String> {
        self.reserved.clone()
    }

    async fn fetch_markets(&self, params: &MarketFetchParams) -> RawResult<Vec<UnifiedMarket>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock() = Some(params.clone());
        if let Some(delay) = self.listing_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = *self.fail_listing_with.lock() {
            return Err(RawError::status(status, "listing failed"));
        }
        let listing = self.listing.lock();
        Ok(listing
            .iter()
            .filter(|m| Self::matches(m, params))
            .cloned()
            .collect())
    }

    async fn fetch_order_book(&self, outcome_id: &str) -> RawResult<OrderBook> {
        self.books
            .lock()
            .get(outcome_id)
            .cloned()
            .ok_or_else(|| RawError::status(404, format!("no book for {outcome_id}")))
    }

    async fn fetch_events(&self, params: &EventFetchParams) -> RawResult<Vec<UnifiedEvent>> {
        *self.last_event_params.lock() = Some(params.clone());
        if let Some(status) = *self.fail_listing_with.lock() {
            return Err(RawError::status(status, "event listing failed"));
        }
        let Some(events) = &self.events else {
            return Err(RawError::status(501, "events not offered"));
        };
        Ok(events
            .iter()
            .filter(|e| params.event_id.as_ref().is_none_or(|id| &e.event_id == id))
            .filter(|e| params.slug.is_none() || e.slug == params.slug)
            .filter(|e| {
                params
                    .query
                    .as_ref()
                    .is_none_or(|q| e.title.to_lowercase().contains(&q.to_lowercase()))
            })
            .cloned()
            .collect())
    }

    async fn fetch_ohlcv(
        &self,
        outcome_id: &str,
        _params: &OhlcvParams,
    ) -> RawResult<Vec<PriceCandle>> {
        self.candles
            .get(outcome_id)
            .cloned()
            .ok_or_else(|| RawError::status(404, format!("no history for {outcome_id}")))
    }

    async fn fetch_trades(&self, outcome_id: &str, params: &TradesParams) -> RawResult<Vec<Trade>> {
        let trades = self
            .trades
            .get(outcome_id)
            .ok_or_else(|| RawError::status(404, format!("no trades for {outcome_id}")))?;
        Ok(trades
            .iter()
            .filter(|t| params.since.is_none_or(|since| t.timestamp >= since))
            .cloned()
            .collect())
    }
}

/// One captured request.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: HttpMethod,
    pub url: String,
    pub options: RequestOptions,
}

/// Transport that records requests and answers with a fixed body or status.
#[derive(Debug)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SentRequest>>,
    pub reply: Mutex<Result<Value, u16>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reply: Mutex::new(Ok(json!({"ok": true}))),
        }
    }
}

impl RecordingTransport {
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Mutex::new(Err(status)),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> RawResult<RawResponse> {
        self.sent.lock().push(SentRequest {
            method,
            url: url.to_string(),
            options,
        });
        match &*self.reply.lock() {
            Ok(body) => Ok(RawResponse::ok(body.clone())),
            Err(status) => Err(RawError::status(*status, "{\"error\":\"rejected\"}")),
        }
    }
}
