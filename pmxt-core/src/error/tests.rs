#![allow(clippy::disallowed_methods)] // unwrap() is acceptable in tests

use super::convert::{MAX_ERROR_MESSAGE_LEN, truncate_message};
use super::*;
use std::time::Duration;

#[test]
fn test_exchange_error_details_display() {
    let details = ExchangeErrorDetails::new("400", "Bad Request");
    let display = format!("{details}");
    assert!(display.contains("400"));
    assert!(display.contains("Bad Request"));
}

#[test]
fn test_exchange_error_details_with_data() {
    let data = serde_json::json!({"error": "test"});
    let details = ExchangeErrorDetails::with_data("500", "Internal Error", data.clone());
    assert_eq!(details.code, "500");
    assert_eq!(details.data, Some(data));
}

#[test]
fn test_kind_for_core_errors() {
    assert_eq!(
        Error::invalid_argument("amount must be positive").kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(Error::market_not_found("m1").kind(), ErrorKind::NotFound);
    assert_eq!(
        Error::invalid_cursor("!!", "not base64").kind(),
        ErrorKind::InvalidCursor
    );
    assert_eq!(Error::cursor_expired("snap").kind(), ErrorKind::CursorExpired);
    assert_eq!(
        Error::missing_path_parameter("id", "/markets/{id}").kind(),
        ErrorKind::MissingPathParameter
    );
    assert_eq!(
        Error::operation_not_found("getThing").kind(),
        ErrorKind::OperationNotFound
    );
    assert_eq!(Error::authentication("no key").kind(), ErrorKind::Authentication);
}

#[test]
fn test_kind_penetrates_context() {
    let err = Error::cursor_expired("abc")
        .context("page 2")
        .context("fetchMarketsPaginated");
    assert_eq!(err.kind(), ErrorKind::CursorExpired);
    assert!(matches!(err.root_cause(), Error::CursorExpired { .. }));
}

#[test]
fn test_cursor_expired_message_tells_caller_to_restart() {
    let err = Error::cursor_expired("1700000000000-1-ab");
    let msg = err.to_string();
    assert!(msg.contains("1700000000000-1-ab"));
    assert!(msg.contains("first page"));
}

#[test]
fn test_missing_path_parameter_names_token_and_path() {
    let err = Error::missing_path_parameter("id", "/markets/{id}");
    let msg = err.to_string();
    assert!(msg.contains("'id'"));
    assert!(msg.contains("/markets/{id}"));
}

#[test]
fn test_invalid_cursor_truncates_long_tokens() {
    let token = "a".repeat(500);
    match Error::invalid_cursor(&token, "bad") {
        Error::InvalidCursor { cursor, .. } => {
            assert!(cursor.len() < 100);
            assert!(cursor.ends_with("..."));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_not_found_identifier() {
    let err = Error::market_not_found("will-it-rain").context("fetchMarket");
    assert_eq!(err.not_found_identifier(), Some("will-it-rain"));
    assert_eq!(Error::timeout("t").not_found_identifier(), None);
}

#[test]
fn test_report_includes_chain() {
    let err = Error::network("Connection refused").context("Failed to fetch markets");
    let report = err.report();
    assert!(report.starts_with("Failed to fetch markets"));
    assert!(report.contains("Caused by"));
    assert!(report.contains("Connection refused"));
}

#[test]
fn test_retryable_classification() {
    assert!(Error::network("reset").is_retryable());
    assert!(Error::timeout("slow").is_retryable());
    assert!(Error::rate_limit("429", None).is_retryable());
    assert!(Error::rate_limit("429", None).context("ctx").is_retryable());
    assert!(!Error::cursor_expired("s").is_retryable());
    assert!(!Error::invalid_argument("x").is_retryable());
    assert!(!Error::authentication("x").is_retryable());
}

#[test]
fn test_retry_after_through_context() {
    let err = Error::rate_limit("slow down", Some(Duration::from_secs(5))).context("ctx");
    assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
}

#[test]
fn test_as_authentication() {
    let err = Error::authentication("API key is required").context("sign");
    assert_eq!(err.as_authentication(), Some("API key is required"));
    assert_eq!(Error::timeout("t").as_authentication(), None);
}

#[test]
fn test_context_ext_on_result_and_option() {
    let res: std::result::Result<(), NetworkError> = Err(NetworkError::Timeout);
    let err = res.context("loading markets").unwrap_err();
    assert_eq!(err.to_string(), "loading markets");
    assert_eq!(err.kind(), ErrorKind::Network);

    let none: Option<u32> = None;
    let err = none.with_context(|| format!("missing {}", "limit")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: Error = json_err.into();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_truncate_message() {
    let short = "short".to_string();
    assert_eq!(truncate_message(short.clone()), short);

    let long = "é".repeat(MAX_ERROR_MESSAGE_LEN);
    let truncated = truncate_message(long);
    assert!(truncated.ends_with("... (truncated)"));
}

#[test]
fn test_error_is_send_sync_static() {
    fn assert_bounds<T: Send + Sync + 'static>() {}
    assert_bounds::<Error>();
    assert_bounds::<RawError>();
}

#[test]
fn test_error_size_stays_small() {
    assert!(std::mem::size_of::<Error>() <= 64);
}
