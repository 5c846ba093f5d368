//! Output shapes a fetched row set can be coerced into.
//!
//! | Target | Options | Description |
//! |--------|---------|-------------|
//! | `Vec<Vec<Value>>` | `()` | Rows of raw JSON cells (the default) |
//! | `Vec<CandleRow>` | `()` | Rows kept in their six-cell wrapper |
//! | [`CandleTable`] | [`TableOptions`] | Rows under labelled columns |
//! | `Vec<Candle>` | `()` | Typed OHLCV candles |

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Candle, CandleRow, CANDLE_FIELDS};

/// Failure to build the requested output shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("response did not include a data field")]
    MissingData,
    #[error("expected {expected} column labels, got {actual}")]
    ColumnCount { expected: usize, actual: usize },
    #[error("duplicate column label '{name}'")]
    DuplicateColumn { name: String },
    #[error("row {row}, column '{column}': {reason} (value {value})")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}

/// A container that can be built from fetched candle rows.
pub trait FromCandles: Sized {
    type Options;

    fn from_candles(rows: Vec<CandleRow>, options: Self::Options) -> Result<Self, CoercionError>;
}

impl FromCandles for Vec<Vec<Value>> {
    type Options = ();

    fn from_candles(rows: Vec<CandleRow>, _options: ()) -> Result<Self, CoercionError> {
        Ok(rows.into_iter().map(CandleRow::into_values).collect())
    }
}

impl FromCandles for Vec<CandleRow> {
    type Options = ();

    fn from_candles(rows: Vec<CandleRow>, _options: ()) -> Result<Self, CoercionError> {
        Ok(rows)
    }
}

impl FromCandles for Vec<Candle> {
    type Options = ();

    fn from_candles(rows: Vec<CandleRow>, _options: ()) -> Result<Self, CoercionError> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| Candle::from_row(row, index))
            .collect()
    }
}

/// Column labels for [`CandleTable`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOptions {
    /// Six labels in wire order; `None` uses [`CANDLE_FIELDS`].
    pub columns: Option<Vec<String>>,
}

impl TableOptions {
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: Some(columns.into_iter().map(Into::into).collect()),
        }
    }
}

/// Candle rows under labelled columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleTable {
    columns: Vec<String>,
    rows: Vec<CandleRow>,
}

impl CandleTable {
    pub fn new(rows: Vec<CandleRow>, options: TableOptions) -> Result<Self, CoercionError> {
        let columns = match options.columns {
            Some(columns) => columns,
            None => CANDLE_FIELDS.iter().map(|field| (*field).to_owned()).collect(),
        };

        if columns.len() != CANDLE_FIELDS.len() {
            return Err(CoercionError::ColumnCount {
                expected: CANDLE_FIELDS.len(),
                actual: columns.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(CoercionError::DuplicateColumn { name: name.clone() });
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CandleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the column labelled `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|column| column == name)?;
        Some(self.rows.iter().map(|row| &row.cells()[index]).collect())
    }
}

impl FromCandles for CandleTable {
    type Options = TableOptions;

    fn from_candles(rows: Vec<CandleRow>, options: TableOptions) -> Result<Self, CoercionError> {
        Self::new(rows, options)
    }
}
