//! Market index loading under concurrent callers.

mod common;

use common::MockVenue;
use pmxt_core::error::ErrorKind;
use pmxt_core::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn slow_runtime(markets: Vec<UnifiedMarket>) -> (Arc<MockVenue>, Arc<ExchangeRuntime>) {
    let venue = Arc::new(MockVenue {
        listing_delay: Some(Duration::from_millis(50)),
        ..MockVenue::with_markets(markets)
    });
    let runtime = ExchangeRuntime::builder(venue.clone())
        .transport(Arc::new(common::RecordingTransport::default()))
        .build()
        .unwrap();
    (venue, Arc::new(runtime))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_loads_fetch_once() {
    let (venue, exchange) = slow_runtime(common::markets(5));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let exchange = Arc::clone(&exchange);
            tokio::spawn(async move { exchange.load_markets(false).await })
        })
        .collect();

    let mut loaded = Vec::new();
    for handle in handles {
        loaded.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(venue.calls(), 1);
    assert!(loaded.iter().all(|index| Arc::ptr_eq(index, &loaded[0])));
    assert_eq!(loaded[0].len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reloads_coalesce() {
    let (venue, exchange) = slow_runtime(common::markets(2));
    exchange.load_markets(false).await.unwrap();
    assert_eq!(venue.calls(), 1);

    let start = Arc::new(tokio::sync::Barrier::new(6));
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let exchange = Arc::clone(&exchange);
            let start = Arc::clone(&start);
            tokio::spawn(async move {
                start.wait().await;
                exchange.load_markets(true).await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // One reload fetches; the others queued behind it reuse its result.
    assert_eq!(venue.calls(), 2);
}

#[tokio::test]
async fn test_reload_swaps_whole_index() {
    let (venue, exchange) = slow_runtime(common::markets(3));
    let first = exchange.load_markets(false).await.unwrap();
    assert!(exchange.market("m2").is_some());

    *venue.listing.lock() = vec![common::market("fresh", "Fresh", Decimal::new(3, 1))];
    let second = exchange.load_markets(true).await.unwrap();

    // The old index is untouched for anyone still holding it.
    assert_eq!(first.len(), 3);
    assert!(first.get("m2").is_some());

    assert_eq!(second.len(), 1);
    assert!(exchange.market("m2").is_none());
    assert_eq!(
        exchange.market_by_slug("fresh-slug").map(|m| m.market_id.clone()),
        Some("fresh".to_string())
    );
    assert_eq!(exchange.market_index().generation(), 2);
}

#[tokio::test]
async fn test_failed_reload_keeps_serving_previous_index() {
    let (venue, exchange) = slow_runtime(common::markets(3));
    exchange.load_markets(false).await.unwrap();

    *venue.fail_listing_with.lock() = Some(503);
    let err = exchange.load_markets(true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Exchange);

    assert_eq!(exchange.market_index().snapshot().unwrap().len(), 3);
    assert!(exchange.market("m0").is_some());
}

#[tokio::test]
async fn test_readers_never_block_on_a_load() {
    let (_, exchange) = slow_runtime(common::markets(3));
    exchange.load_markets(false).await.unwrap();

    let reloading = {
        let exchange = Arc::clone(&exchange);
        tokio::spawn(async move { exchange.load_markets(true).await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(exchange.market("m1").is_some());

    reloading.await.unwrap().unwrap();
}
