use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::output::CoercionError;

/// Column labels of a candle row, in wire order.
pub const CANDLE_FIELDS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// One raw candle exactly as the broker returned it.
///
/// Cells are kept as JSON values; the fetch path does not validate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandleRow([Value; 6]);

impl CandleRow {
    pub fn new(cells: [Value; 6]) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[Value; 6] {
        &self.0
    }

    pub fn cell(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn timestamp(&self) -> &Value {
        &self.0[0]
    }

    pub fn open(&self) -> &Value {
        &self.0[1]
    }

    pub fn high(&self) -> &Value {
        &self.0[2]
    }

    pub fn low(&self) -> &Value {
        &self.0[3]
    }

    pub fn close(&self) -> &Value {
        &self.0[4]
    }

    pub fn volume(&self) -> &Value {
        &self.0[5]
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0.into()
    }
}

/// Typed OHLCV candle parsed from a [`CandleRow`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    #[serde(serialize_with = "serialize_rfc3339")]
    pub timestamp: OffsetDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Parse a raw row; `row_index` is only used for error reporting.
    pub fn from_row(row: &CandleRow, row_index: usize) -> Result<Self, CoercionError> {
        let timestamp = match row.timestamp() {
            Value::String(text) => OffsetDateTime::parse(text, &Rfc3339).map_err(|error| {
                invalid_cell(row_index, 0, row.timestamp(), error.to_string())
            })?,
            other => {
                return Err(invalid_cell(
                    row_index,
                    0,
                    other,
                    String::from("timestamp must be an RFC3339 string"),
                ))
            }
        };

        Ok(Self {
            timestamp,
            open: numeric_cell(row, row_index, 1)?,
            high: numeric_cell(row, row_index, 2)?,
            low: numeric_cell(row, row_index, 3)?,
            close: numeric_cell(row, row_index, 4)?,
            volume: numeric_cell(row, row_index, 5)?,
        })
    }
}

fn numeric_cell(row: &CandleRow, row_index: usize, column: usize) -> Result<f64, CoercionError> {
    let value = &row.cells()[column];
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(invalid_cell(
            row_index,
            column,
            value,
            String::from("expected a finite number"),
        )),
    }
}

fn invalid_cell(row: usize, column: usize, value: &Value, reason: String) -> CoercionError {
    CoercionError::InvalidCell {
        row,
        column: CANDLE_FIELDS[column],
        value: value.to_string(),
        reason,
    }
}

fn serialize_rfc3339<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
