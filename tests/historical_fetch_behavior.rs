//! Behavior-driven tests for historical candle fetching
//!
//! These tests verify HOW a fetch moves from caller input to coerced rows,
//! using a stub client that records every call it receives.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use angelfetch_core::{
    BrokerError, Candle, CandleClient, CandleRequest, CandleResponse, CandleRow, CandleTable,
    ClientError, CoercionError, CoreError, ErrorCatalog, HistoricalData, HistoricalFetcher,
    HistoryQuery, Interval, TableOptions, ValidationError,
};
use serde_json::{json, Value};

// =============================================================================
// Stub client
// =============================================================================

enum StubReply {
    Rows(Value),
    NoData,
    Broker(&'static str, &'static str),
}

struct StubClient {
    reply: StubReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<CandleRequest>>,
}

impl StubClient {
    fn returning(rows: Value) -> Self {
        Self::with_reply(StubReply::Rows(rows))
    }

    fn with_reply(reply: StubReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<CandleRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .last()
            .cloned()
    }
}

impl CandleClient for StubClient {
    fn get_candles<'a>(
        &'a self,
        request: &'a CandleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CandleResponse, ClientError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request.clone());

        let reply = match &self.reply {
            StubReply::Rows(rows) => serde_json::from_value::<Vec<CandleRow>>(rows.clone())
                .map(CandleResponse::with_rows)
                .map_err(ClientError::from),
            StubReply::NoData => Ok(CandleResponse::default()),
            StubReply::Broker(code, message) => Err(BrokerError::new(*code, *message).into()),
        };
        Box::pin(async move { reply })
    }
}

fn nifty_rows() -> Value {
    json!([[
        "2025-01-10T15:00:00+05:30",
        "23410.85",
        "23418.9",
        "23402.95",
        "23404.25",
        "0"
    ]])
}

// =============================================================================
// Fetch: Happy Path
// =============================================================================

#[tokio::test]
async fn when_nifty_minute_candles_are_requested_default_output_matches_the_raw_rows() {
    // Given: A fetcher for NIFTY 50 and a client returning one candle
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    // When: Thirty minutes of 1M candles are fetched
    let query = HistoryQuery::new("1M", "2025-01-10 15:00", "2025-01-10 15:30");
    let rows = fetcher.fetch(query, &client).await.expect("fetch succeeds");

    // Then: The default output is the rows exactly as returned
    assert_eq!(Value::from(rows), nifty_rows());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn when_shorthand_interval_is_used_payload_carries_canonical_values() {
    // Given: A fetcher and a recording client
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    // When: A shorthand interval is requested
    let query = HistoryQuery::new("1M", "2025-01-10 15:00", "2025-01-10 15:30");
    fetcher.fetch(query, &client).await.expect("fetch succeeds");

    // Then: The client receives the normalized payload
    let request = client.last_request().expect("client was called");
    assert_eq!(
        serde_json::to_value(&request).expect("payload serializes"),
        json!({
            "exchange": "NSE",
            "symboltoken": "99926000",
            "interval": "ONE_MINUTE",
            "fromdate": "2025-01-10 15:00",
            "todate": "2025-01-10 15:30"
        })
    );
}

#[tokio::test]
async fn when_table_output_is_requested_rows_are_labelled() {
    // Given: A fetcher and a client returning one candle
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    // When: The caller asks for a table with custom labels
    let query = HistoryQuery::new("ONE_MINUTE", "2025-01-10 15:00", "2025-01-10 15:30");
    let options = TableOptions::with_columns(["ts", "open", "high", "low", "close", "vol"]);
    let table: CandleTable = fetcher
        .fetch_as(query, &client, options)
        .await
        .expect("fetch succeeds");

    // Then: Columns are addressable by label
    assert_eq!(table.len(), 1);
    assert_eq!(table.column("close"), Some(vec![&json!("23404.25")]));
}

#[tokio::test]
async fn when_typed_output_is_requested_prices_become_numbers() {
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    let query = HistoryQuery::new("1M", "2025-01-10 15:00", "2025-01-10 15:30");
    let candles: Vec<Candle> = fetcher
        .fetch_as(query, &client, ())
        .await
        .expect("fetch succeeds");

    assert_eq!(candles.len(), 1);
    assert_eq!(candles[0].open, 23410.85);
    assert_eq!(candles[0].low, 23402.95);
}

// =============================================================================
// Fetch: Validation Happens Before The Client
// =============================================================================

#[tokio::test]
async fn when_exchange_is_unknown_construction_fails_without_client_interaction() {
    // Given: A client that would answer if asked
    let client = StubClient::returning(nifty_rows());

    // When: A fetcher is built for an unlisted exchange
    let result = HistoricalData::new("XYZ", "99926000");

    // Then: Construction fails and the client was never called
    let error = result.expect_err("unknown exchange must fail");
    assert!(error.is_configuration());
    assert!(error.to_string().contains("XYZ"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn when_interval_is_unknown_fetch_fails_before_the_network() {
    let fetcher = HistoricalData::new("MCX", "12345").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    let query = HistoryQuery::new("2H", "2025-01-10 15:00", "2025-01-10 15:30");
    let error = fetcher.fetch(query, &client).await.expect_err("must fail");

    assert!(matches!(
        error,
        CoreError::Validation(ValidationError::ValueNotAllowed {
            label: "Interval",
            ..
        })
    ));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn when_window_exceeds_interval_limit_fetch_fails_before_the_network() {
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    let query = HistoryQuery::new("1M", "2025-01-01 00:00", "2025-01-31 00:01");
    let error = fetcher.fetch(query, &client).await.expect_err("must fail");

    assert!(matches!(
        error,
        CoreError::Validation(ValidationError::RangeTooLarge {
            interval: Interval::OneMinute,
            ..
        })
    ));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn when_date_string_does_not_match_the_pattern_fetch_fails_before_the_network() {
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    let query = HistoryQuery::new("1D", "2025-01-01T00:00:00", "2025-01-31 00:00");
    let error = fetcher.fetch(query, &client).await.expect_err("must fail");

    assert!(matches!(
        error,
        CoreError::Validation(ValidationError::InvalidDateFormat { field: "from", .. })
    ));
    assert_eq!(client.calls(), 0);
}

// =============================================================================
// Fetch: Remote And Coercion Failures Propagate Unchanged
// =============================================================================

#[tokio::test]
async fn when_broker_rejects_the_call_its_code_reaches_the_caller() {
    // Given: A client that fails with a broker error code
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::with_reply(StubReply::Broker("AG8001", "Invalid Token"));

    // When: A valid window is fetched
    let query = HistoryQuery::new("1D", "2025-01-01 00:00", "2025-01-31 00:00");
    let error = fetcher.fetch(query, &client).await.expect_err("must fail");

    // Then: The broker error is surfaced untranslated and describable
    let CoreError::Client(ClientError::Broker(broker)) = error else {
        panic!("expected broker error, got {error:?}");
    };
    assert_eq!(broker.code, "AG8001");
    assert!(broker
        .describe(&ErrorCatalog::embedded())
        .contains("Internal Message Description: Invalid Token"));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn when_response_has_no_data_field_fetch_reports_coercion_error() {
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::with_reply(StubReply::NoData);

    let query = HistoryQuery::new("1D", "2025-01-01 00:00", "2025-01-31 00:00");
    let error = fetcher.fetch(query, &client).await.expect_err("must fail");

    assert!(matches!(error, CoreError::Coercion(CoercionError::MissingData)));
}

#[tokio::test]
async fn when_table_labels_are_malformed_coercion_error_propagates() {
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");
    let client = StubClient::returning(nifty_rows());

    let query = HistoryQuery::new("1M", "2025-01-10 15:00", "2025-01-10 15:30");
    let result: Result<CandleTable, _> = fetcher
        .fetch_as(query, &client, TableOptions::with_columns(["only", "three", "labels"]))
        .await;

    assert!(matches!(
        result,
        Err(CoreError::Coercion(CoercionError::ColumnCount {
            expected: 6,
            actual: 3
        }))
    ));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn each_fetch_makes_exactly_one_client_call() {
    let fetcher = HistoricalData::new("NFO", "43210").expect("valid instrument");
    let client = StubClient::returning(json!([]));

    for _ in 0..3 {
        let query = HistoryQuery::new("5M", "2025-01-10 09:15", "2025-01-10 15:30");
        let rows = fetcher.fetch(query, &client).await.expect("fetch succeeds");
        assert!(rows.is_empty());
    }

    assert_eq!(client.calls(), 3);
}
