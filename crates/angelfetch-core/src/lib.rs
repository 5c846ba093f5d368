//! # angelfetch core
//!
//! Validated historical candle requests against Angel One's SmartAPI.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Exchanges, intervals, instruments, dates and candles |
//! | [`validation`] | Allow-list checks, interval expansion, window limits |
//! | [`fetcher`] | [`HistoricalFetcher`] contract and [`HistoricalData`] |
//! | [`client`] | [`CandleClient`] capability, payload and broker errors |
//! | [`output`] | [`FromCandles`] output shapes |
//! | [`planning`] | Splitting long windows into request-sized chunks |
//! | [`adapters`] | SmartAPI login and candle transport |
//! | [`session`] | [`SessionProvider`] contract and session tokens |
//! | [`error_catalog`] | Broker error code descriptions |
//! | [`config`] | Environment-driven settings and credentials |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`error`] | Core error types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use angelfetch_core::{HistoricalData, HistoricalFetcher, HistoryQuery};
//!
//! let fetcher = HistoricalData::new("NSE", "99926000")?;
//! let query = HistoryQuery::new("1M", "2025-01-10 15:00", "2025-01-10 15:30");
//! let rows = fetcher.fetch(query, &client).await?;
//! ```
//!
//! ## Error Handling
//!
//! Validation failures ([`ValidationError`]) are raised before the client is
//! called. Broker failures arrive as [`BrokerError`] inside [`ClientError`]
//! and are never translated inline; render them with
//! [`BrokerError::describe`] and an [`ErrorCatalog`].

pub mod adapters;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod error_catalog;
pub mod fetcher;
pub mod http_client;
pub mod output;
pub mod planning;
pub mod session;
pub mod validation;

pub use adapters::{SmartApiClient, SmartApiGateway};

pub use client::{BrokerError, CandleClient, CandleRequest, CandleResponse, ClientError};

pub use config::{ClientConfig, Credentials, OneTimePassword, TotpSecret};

pub use domain::{
    Candle, CandleRow, DateFormat, DateInput, Exchange, Instrument, Interval, SymbolToken,
    CANDLE_FIELDS, DEFAULT_DATE_FORMAT,
};

pub use error::{CoreError, ValidationError};

pub use error_catalog::{ErrorCatalog, UNKNOWN_ERROR};

pub use fetcher::{HistoricalData, HistoricalFetcher, HistoryQuery};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use output::{CandleTable, CoercionError, FromCandles, TableOptions};

pub use planning::{plan_chunks, plan_formatted, Window};

pub use session::{Session, SessionProvider};

pub use validation::{normalize_interval, normalize_range, validate_enum};
