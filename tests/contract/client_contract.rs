use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use angelfetch_core::adapters::{CANDLE_PATH, LOGIN_PATH};
use angelfetch_core::{
    CandleClient, ClientConfig, ClientError, Credentials, HistoricalData, HistoricalFetcher,
    HistoryQuery, HttpClient, HttpError, HttpRequest, HttpResponse, Session, SessionProvider,
    SmartApiClient, SmartApiGateway,
};
use serde_json::{json, Value};

const BASE_URL: &str = "https://smartapi.test";

/// Replays queued responses and records every request it is handed.
#[derive(Default)]
struct RecordingHttpClient {
    replies: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    fn replying(replies: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("lock").push(request);
        let reply = self
            .replies
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::InvalidRequest(String::from("no reply queued"))));
        Box::pin(async move { reply })
    }
}

fn config() -> ClientConfig {
    ClientConfig::new("api-key-1").with_base_url(BASE_URL)
}

fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_str(&request.body).expect("body is json")
}

fn candle_client(http: Arc<RecordingHttpClient>) -> SmartApiClient {
    SmartApiClient::new(http, config(), Session::new("Bearer jwt-abc"))
}

#[test]
fn login_posts_credentials_and_returns_session() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":true,"message":"SUCCESS","errorcode":"","data":{"jwtToken":"Bearer jwt-abc","refreshToken":"r-1","feedToken":"f-1"}}"#,
    ))]);
    let gateway = SmartApiGateway::new(http.clone(), config());
    let credentials = Credentials::new("A123456", "4321", "987654");

    let session = block_on(gateway.login(&credentials)).expect("login succeeds");
    assert_eq!(session.access_token(), "jwt-abc");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, format!("{BASE_URL}{LOGIN_PATH}"));
    assert_eq!(request.header("X-PrivateKey"), Some("api-key-1"));
    assert_eq!(request.header("authorization"), None);
    assert_eq!(
        body_json(request),
        json!({ "clientcode": "A123456", "password": "4321", "totp": "987654" })
    );
}

#[test]
fn login_with_totp_seed_sends_the_derived_code() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":true,"message":"SUCCESS","errorcode":"","data":{"jwtToken":"jwt-abc","refreshToken":"r-1","feedToken":"f-1"}}"#,
    ))]);
    let gateway = SmartApiGateway::new(http.clone(), config());
    let credentials =
        Credentials::with_totp_secret("A123456", "4321", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")
            .expect("valid seed");

    let before = credentials.totp.current();
    block_on(gateway.login(&credentials)).expect("login succeeds");
    let after = credentials.totp.current();

    let body = body_json(&http.requests()[0]);
    let sent = body["totp"].as_str().expect("totp is a string");
    assert_eq!(sent.len(), 6);
    assert!(sent.chars().all(|ch| ch.is_ascii_digit()));
    assert!(sent == before || sent == after);
}

#[test]
fn login_rejection_surfaces_broker_code() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":false,"message":"Invalid totp","errorcode":"AB1050","data":null}"#,
    ))]);
    let gateway = SmartApiGateway::new(http, config());

    let error = block_on(gateway.login(&Credentials::new("A123456", "4321", "000000")))
        .expect_err("login must fail");
    assert!(matches!(
        error,
        ClientError::Broker(ref broker) if broker.code == "AB1050" && broker.message == "Invalid totp"
    ));
}

#[test]
fn candle_call_sends_session_and_normalized_payload() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":true,"message":"SUCCESS","errorcode":"","data":[["2025-01-10T15:00:00+05:30",23410.85,23418.9,23402.95,23404.25,0]]}"#,
    ))]);
    let client = candle_client(http.clone());
    let fetcher = HistoricalData::new("NSE", "99926000").expect("valid instrument");

    let rows = block_on(fetcher.fetch(
        HistoryQuery::new("1M", "2025-01-10 15:00", "2025-01-10 15:30"),
        &client,
    ))
    .expect("fetch succeeds");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][4], json!(23404.25));

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, format!("{BASE_URL}{CANDLE_PATH}"));
    assert_eq!(request.header("authorization"), Some("Bearer jwt-abc"));
    assert_eq!(request.header("x-privatekey"), Some("api-key-1"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("x-usertype"), Some("USER"));
    assert_eq!(request.header("x-sourceid"), Some("WEB"));
    assert_eq!(request.timeout_ms, 7_000);
    assert_eq!(
        body_json(request),
        json!({
            "exchange": "NSE",
            "symboltoken": "99926000",
            "interval": "ONE_MINUTE",
            "fromdate": "2025-01-10 15:00",
            "todate": "2025-01-10 15:30"
        })
    );
}

#[test]
fn candle_broker_failure_is_not_retried() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":false,"message":"Invalid Token","errorcode":"AG8001","data":null}"#,
    ))]);
    let client = candle_client(http.clone());
    let request = HistoricalData::new("NSE", "99926000")
        .expect("valid instrument")
        .prepare(&HistoryQuery::new("1D", "2025-01-01 00:00", "2025-01-31 00:00"))
        .expect("valid query");

    let error = block_on(client.get_candles(&request)).expect_err("must fail");
    assert!(matches!(
        error,
        ClientError::Broker(ref broker) if broker.code == "AG8001"
    ));
    assert_eq!(http.requests().len(), 1);
}

#[test]
fn transport_failure_is_reported_as_transport_error() {
    let http = RecordingHttpClient::replying(vec![Err(HttpError::Timeout { timeout_ms: 7_000 })]);
    let client = candle_client(http);
    let request = HistoricalData::new("BSE", "500325")
        .expect("valid instrument")
        .prepare(&HistoryQuery::new("1D", "2025-01-01 00:00", "2025-01-31 00:00"))
        .expect("valid query");

    let error = block_on(client.get_candles(&request)).expect_err("must fail");
    assert!(matches!(error, ClientError::Transport(ref http) if http.retryable()));
}

#[test]
fn successful_envelope_without_data_yields_empty_response() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":true,"message":"SUCCESS","errorcode":"","data":null}"#,
    ))]);
    let client = candle_client(http);
    let request = HistoricalData::new("NSE", "99926000")
        .expect("valid instrument")
        .prepare(&HistoryQuery::new("1D", "2025-01-01 00:00", "2025-01-31 00:00"))
        .expect("valid query");

    let response = block_on(client.get_candles(&request)).expect("call succeeds");
    assert_eq!(response.data, None);
}

#[test]
fn row_with_missing_cells_fails_the_whole_response() {
    let http = RecordingHttpClient::replying(vec![Ok(HttpResponse::ok_json(
        r#"{"status":true,"message":"SUCCESS","errorcode":"","data":[["2025-01-10T15:00:00+05:30",1.0,2.0,0.5,1.5]]}"#,
    ))]);
    let client = candle_client(http);
    let request = HistoricalData::new("NSE", "99926000")
        .expect("valid instrument")
        .prepare(&HistoryQuery::new("1D", "2025-01-01 00:00", "2025-01-31 00:00"))
        .expect("valid query");

    let error = block_on(client.get_candles(&request)).expect_err("must fail");
    assert!(matches!(error, ClientError::Decode(_)));
}

fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = std::pin::pin!(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
}

unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}

unsafe fn noop_raw_waker_wake(_: *const ()) {}

unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

unsafe fn noop_raw_waker_drop(_: *const ()) {}

static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    noop_raw_waker_clone,
    noop_raw_waker_wake,
    noop_raw_waker_wake_by_ref,
    noop_raw_waker_drop,
);
