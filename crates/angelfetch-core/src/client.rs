//! Candle client capability.
//!
//! A [`CandleClient`] performs the single network call behind a fetch. The
//! fetcher only ever sees this trait, so tests substitute a stub and the
//! CLI plugs in [`SmartApiClient`](crate::adapters::SmartApiClient).

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CandleRow, Exchange, Interval, SymbolToken};
use crate::error_catalog::ErrorCatalog;
use crate::http_client::HttpError;

/// Normalized payload for the historical candle endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleRequest {
    pub exchange: Exchange,
    #[serde(rename = "symboltoken")]
    pub symbol_token: SymbolToken,
    pub interval: Interval,
    #[serde(rename = "fromdate")]
    pub from_date: String,
    #[serde(rename = "todate")]
    pub to_date: String,
}

/// Body returned by a candle call; only `data` is consumed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandleResponse {
    #[serde(default)]
    pub data: Option<Vec<CandleRow>>,
}

impl CandleResponse {
    pub fn with_rows(rows: Vec<CandleRow>) -> Self {
        Self { data: Some(rows) }
    }
}

/// Error reported by the brokerage itself.
///
/// Carries the broker's code and message verbatim; use
/// [`describe`](BrokerError::describe) to attach the catalog description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("broker error {code}: {message}")]
pub struct BrokerError {
    pub code: String,
    pub message: String,
}

impl BrokerError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Multi-line presentation combining the catalog description for the
    /// code with the message the broker sent.
    pub fn describe(&self, catalog: &ErrorCatalog) -> String {
        format!(
            "Error Code: {}\n  >> Internal Message Description: {}\n  >> Custom Message Description: {}",
            self.code,
            catalog.message(&self.code),
            self.message
        )
    }
}

/// Failure of a candle or session call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("upstream returned status {status}")]
    HttpStatus { status: u16 },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Capability that performs the historical candle call.
pub trait CandleClient: Send + Sync {
    fn get_candles<'a>(
        &'a self,
        request: &'a CandleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CandleResponse, ClientError>> + Send + 'a>>;
}
