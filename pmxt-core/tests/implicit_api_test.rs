//! Implicit API behaviour through a fully wired runtime.

mod common;

use common::{MockVenue, RecordingTransport};
use pmxt_core::error::ErrorKind;
use pmxt_core::prelude::*;
use pmxt_core::types::{ApiDescriptor, ApiParams, EndpointDescriptor, HttpMethod};
use serde_json::json;
use std::sync::Arc;

const BASE: &str = "https://api.venue.test";

fn catalog() -> ApiDescriptor {
    ApiDescriptor::new(BASE)
        .endpoint(
            "getMarket",
            EndpointDescriptor::public(HttpMethod::Get, "/markets/{id}"),
        )
        .endpoint(
            "createOrder",
            EndpointDescriptor::private(HttpMethod::Post, "/orders"),
        )
        .endpoint(
            "fetchMarkets",
            EndpointDescriptor::public(HttpMethod::Get, "/raw/markets"),
        )
}

fn runtime_with(
    descriptors: Vec<ApiDescriptor>,
    transport: Arc<RecordingTransport>,
    config: RuntimeConfig,
) -> ExchangeRuntime {
    let venue = MockVenue {
        descriptors,
        ..MockVenue::with_markets(common::markets(3))
    };
    ExchangeRuntime::builder(Arc::new(venue))
        .config(config)
        .transport(transport)
        .build()
        .unwrap()
}

fn params(pairs: serde_json::Value) -> ApiParams {
    serde_json::from_value(pairs).unwrap()
}

#[tokio::test]
async fn test_path_parameter_is_substituted_and_the_rest_goes_to_the_query() {
    let transport = Arc::new(RecordingTransport::default());
    let exchange = runtime_with(vec![catalog()], transport.clone(), RuntimeConfig::default());

    let body = exchange
        .call_api("getMarket", params(json!({"id": 42, "foo": "bar"})))
        .await
        .unwrap();
    assert_eq!(body, json!({"ok": true}));

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].url, "https://api.venue.test/markets/42");
    assert_eq!(sent[0].options.query, Some(params(json!({"foo": "bar"}))));
    assert!(sent[0].options.body.is_none());
}

#[tokio::test]
async fn test_catalog_cannot_shadow_a_built_in_operation() {
    let transport = Arc::new(RecordingTransport::default());
    let exchange = runtime_with(vec![catalog()], transport.clone(), RuntimeConfig::default());

    assert!(!exchange.implicit_api().has("fetchMarkets"));
    let err = exchange
        .call_api("fetchMarkets", ApiParams::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationNotFound);

    // The built-in still answers from the venue.
    let markets = exchange.fetch_markets(&MarketFetchParams::new()).await.unwrap();
    assert_eq!(markets.len(), 3);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_registering_the_same_catalog_twice_changes_nothing() {
    let transport = Arc::new(RecordingTransport::default());
    let exchange = runtime_with(vec![catalog()], transport, RuntimeConfig::default());

    let before = exchange.implicit_api().names();
    assert_eq!(before, ["createOrder", "getMarket"]);
    assert!(exchange.register_api(&catalog()).is_empty());
    assert_eq!(exchange.implicit_api().names(), before);
}

#[tokio::test]
async fn test_disjoint_catalogs_are_both_callable() {
    let transport = Arc::new(RecordingTransport::default());
    let data = ApiDescriptor::new("https://data.venue.test/v2/").endpoint(
        "getTrades",
        EndpointDescriptor::public(HttpMethod::Get, "trades/{market}"),
    );
    let exchange = runtime_with(vec![catalog(), data], transport.clone(), RuntimeConfig::default());

    exchange
        .call_api("getMarket", params(json!({"id": "abc"})))
        .await
        .unwrap();
    exchange
        .call_api("getTrades", params(json!({"market": "abc"})))
        .await
        .unwrap();

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        [
            "https://api.venue.test/markets/abc",
            "https://data.venue.test/v2/trades/abc"
        ]
    );
}

#[tokio::test]
async fn test_private_post_is_signed_with_configured_key() {
    let transport = Arc::new(RecordingTransport::default());
    let config = RuntimeConfig::builder().api_key("k-123").build();
    let exchange = runtime_with(vec![catalog()], transport.clone(), config);

    exchange
        .call_api("createOrder", params(json!({"side": "buy", "amount": 5})))
        .await
        .unwrap();

    let sent = transport.requests();
    let request = &sent[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.options.body, Some(json!({"side": "buy", "amount": 5})));
    assert!(request.options.query.is_none());
    assert_eq!(
        request.options.headers.get("X-API-KEY").map(String::as_str),
        Some("k-123")
    );
}

#[tokio::test]
async fn test_private_call_without_credentials_fails_before_sending() {
    let transport = Arc::new(RecordingTransport::default());
    let exchange = runtime_with(vec![catalog()], transport.clone(), RuntimeConfig::default());

    let err = exchange
        .call_api("createOrder", ApiParams::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_missing_path_parameter_names_the_placeholder() {
    let transport = Arc::new(RecordingTransport::default());
    let exchange = runtime_with(vec![catalog()], transport.clone(), RuntimeConfig::default());

    let err = exchange
        .call_api("getMarket", params(json!({"foo": "bar"})))
        .await
        .unwrap_err();
    match err {
        Error::MissingPathParameter { parameter, path } => {
            assert_eq!(parameter, "id");
            assert_eq!(path, "/markets/{id}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_venue_rejection_is_mapped() {
    let transport = Arc::new(RecordingTransport::failing(429));
    let exchange = runtime_with(vec![catalog()], transport, RuntimeConfig::default());

    let err = exchange
        .call_api("getMarket", params(json!({"id": 1})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert!(err.to_string().contains("[mock]"));
}

#[tokio::test]
async fn test_url_override_redirects_catalog() {
    let transport = Arc::new(RecordingTransport::default());
    let config = RuntimeConfig::builder()
        .url_override(BASE, "http://localhost:9000")
        .build();
    let exchange = runtime_with(vec![catalog()], transport.clone(), config);

    exchange
        .call_api("getMarket", params(json!({"id": 7})))
        .await
        .unwrap();
    assert_eq!(transport.requests()[0].url, "http://localhost:9000/markets/7");
}

#[tokio::test]
async fn test_call_api_capability_follows_registry() {
    let transport = Arc::new(RecordingTransport::default());
    let empty = runtime_with(vec![], transport.clone(), RuntimeConfig::default());
    assert_eq!(empty.has("callApi"), Support::Unsupported);

    let wired = runtime_with(vec![catalog()], transport, RuntimeConfig::default());
    assert_eq!(wired.has("callApi"), Support::Emulated);
}

#[tokio::test]
async fn test_venue_reserved_names_are_never_registered() {
    let transport = Arc::new(RecordingTransport::default());
    let venue = MockVenue {
        descriptors: vec![catalog()],
        reserved: vec!["getMarket".to_string()],
        ..MockVenue::with_markets(common::markets(1))
    };
    let exchange = ExchangeRuntime::builder(Arc::new(venue))
        .transport(transport.clone())
        .build()
        .unwrap();

    assert!(exchange.implicit_api().is_reserved("get_market"));
    assert_eq!(exchange.implicit_api().names(), ["createOrder"]);
    let err = exchange
        .call_api("getMarket", params(json!({"id": 1})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationNotFound);
    assert!(transport.requests().is_empty());

    // Later catalogs are filtered the same way.
    assert!(exchange.register_api(&catalog()).is_empty());
}
