//! HTTP transport seam.
//!
//! Every SmartAPI call is a JSON `POST`, so an [`HttpRequest`] is exactly
//! that: a URL, lowercase headers, a serialized body and a timeout.
//! [`ReqwestHttpClient`] is the production transport; tests substitute a
//! recording fake.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::DEFAULT_TIMEOUT_MS;

/// JSON `POST` handed to an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub timeout_ms: u64,
}

impl HttpRequest {
    /// Serialize `payload` as the body and set the JSON content headers.
    pub fn post_json<T: Serialize + ?Sized>(
        url: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let request = Self {
            url: url.into(),
            headers: BTreeMap::new(),
            body: serde_json::to_string(payload)?,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        };

        Ok(request
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json"))
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("authorization", format!("Bearer {token}"))
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// Failure below the HTTP status line: nothing usable came back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request failed: {0}")]
    Failed(String),
}

impl HttpError {
    /// Hint for callers that retry on their own; nothing in this crate retries.
    pub const fn retryable(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }
}

/// Transport contract used by the SmartAPI adapter.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

const USER_AGENT: &str = concat!("angelfetch/", env!("CARGO_PKG_VERSION"));

impl ReqwestHttpClient {
    pub fn try_new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| HttpError::InvalidRequest(error.to_string()))?;
        Ok(Self { client })
    }

    /// Like [`Self::try_new`], falling back to a stock client without the
    /// user agent when the configured builder fails.
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|error| {
            warn!(%error, "http client builder failed; using default client");
            Self::with_client(reqwest::Client::new())
        })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let timeout_ms = request.timeout_ms;
            let builder = request
                .headers
                .iter()
                .fold(self.client.post(&request.url), |builder, (name, value)| {
                    builder.header(name, value)
                })
                .timeout(Duration::from_millis(timeout_ms))
                .body(request.body);

            let classify = |error: reqwest::Error| {
                if error.is_timeout() {
                    HttpError::Timeout { timeout_ms }
                } else if error.is_connect() {
                    HttpError::Connect(error.to_string())
                } else if error.is_builder() {
                    HttpError::InvalidRequest(error.to_string())
                } else {
                    HttpError::Failed(error.to_string())
                }
            };

            let response = builder.send().await.map_err(classify)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(classify)?;

            Ok(HttpResponse { status, body })
        })
    }
}
