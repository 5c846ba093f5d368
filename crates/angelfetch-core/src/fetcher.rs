//! Historical candle fetching.
//!
//! A [`HistoricalData`] value is bound to one instrument. Each fetch
//! validates the query, makes exactly one [`CandleClient`] call and coerces
//! the returned rows into the requested shape. Nothing is cached, retried
//! or split; oversized windows are rejected before the client is touched
//! (see [`plan_chunks`](crate::planning::plan_chunks) for splitting them).

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tracing::debug;

use crate::client::{CandleClient, CandleRequest};
use crate::domain::{CandleRow, DateFormat, DateInput, Instrument};
use crate::output::{CoercionError, FromCandles};
use crate::validation::{normalize_interval, normalize_range};
use crate::{CoreError, ValidationError};

/// Interval and window of one fetch, plus how boundary strings are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Shorthand (`1M`) or canonical (`ONE_MINUTE`) interval token.
    pub interval: String,
    pub from: DateInput,
    pub to: DateInput,
    pub date_format: DateFormat,
}

impl HistoryQuery {
    pub fn new(
        interval: impl Into<String>,
        from: impl Into<DateInput>,
        to: impl Into<DateInput>,
    ) -> Self {
        Self {
            interval: interval.into(),
            from: from.into(),
            to: to.into(),
            date_format: DateFormat::default(),
        }
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }
}

/// Contract every historical fetcher exposes.
///
/// Implementors provide [`prepare`](HistoricalFetcher::prepare) and
/// [`fetch_rows`](HistoricalFetcher::fetch_rows); the output-shaping
/// methods are derived from them.
pub trait HistoricalFetcher: Send + Sync {
    fn instrument(&self) -> &Instrument;

    /// Validate `query` and build the request payload. Performs no I/O.
    fn prepare(&self, query: &HistoryQuery) -> Result<CandleRequest, ValidationError>;

    /// Validate, call the client once and return the raw rows.
    fn fetch_rows<'a>(
        &'a self,
        query: HistoryQuery,
        client: &'a dyn CandleClient,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CandleRow>, CoreError>> + Send + 'a>>;

    /// Fetch and coerce into `O` using `options`.
    fn fetch_as<'a, O>(
        &'a self,
        query: HistoryQuery,
        client: &'a dyn CandleClient,
        options: O::Options,
    ) -> Pin<Box<dyn Future<Output = Result<O, CoreError>> + Send + 'a>>
    where
        Self: Sized,
        O: FromCandles + Send + 'a,
        O::Options: Send + 'a,
    {
        Box::pin(async move {
            let rows = self.fetch_rows(query, client).await?;
            Ok(O::from_candles(rows, options)?)
        })
    }

    /// Fetch into the default shape: one `Vec` of JSON cells per candle.
    fn fetch<'a>(
        &'a self,
        query: HistoryQuery,
        client: &'a dyn CandleClient,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<Value>>, CoreError>> + Send + 'a>>
    where
        Self: Sized,
    {
        self.fetch_as::<Vec<Vec<Value>>>(query, client, ())
    }
}

/// Historical candle fetcher for a single instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalData {
    instrument: Instrument,
}

impl HistoricalData {
    /// Validate the exchange and symbol token; no client is involved yet.
    pub fn new(exchange: &str, symbol_token: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            instrument: Instrument::parse(exchange, symbol_token)?,
        })
    }

    pub fn for_instrument(instrument: Instrument) -> Self {
        Self { instrument }
    }
}

impl HistoricalFetcher for HistoricalData {
    fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    fn prepare(&self, query: &HistoryQuery) -> Result<CandleRequest, ValidationError> {
        let interval = normalize_interval(&query.interval)?;
        let (from_date, to_date) =
            normalize_range(&query.from, &query.to, interval, &query.date_format)?;

        Ok(CandleRequest {
            exchange: self.instrument.exchange,
            symbol_token: self.instrument.symbol_token.clone(),
            interval,
            from_date,
            to_date,
        })
    }

    fn fetch_rows<'a>(
        &'a self,
        query: HistoryQuery,
        client: &'a dyn CandleClient,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CandleRow>, CoreError>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.prepare(&query)?;
            debug!(
                instrument = %self.instrument,
                interval = %request.interval,
                from = %request.from_date,
                to = %request.to_date,
                "requesting candle data"
            );

            let response = client.get_candles(&request).await?;
            let rows = response.data.ok_or(CoercionError::MissingData)?;
            debug!(rows = rows.len(), "candle data received");
            Ok(rows)
        })
    }
}
