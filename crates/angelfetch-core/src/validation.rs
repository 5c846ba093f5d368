//! Request validation and normalization.
//!
//! Everything here is pure: inputs are checked and rewritten into the exact
//! strings the historical endpoint expects, and oversized windows are
//! rejected before a request is built.

use std::str::FromStr;

use time::PrimitiveDateTime;

use crate::domain::{DateFormat, DateInput, Interval};
use crate::ValidationError;

/// Return `value` unchanged when it is one of `allowed`.
pub fn validate_enum<'a>(
    label: &'static str,
    value: &'a str,
    allowed: &[&str],
) -> Result<&'a str, ValidationError> {
    if allowed.contains(&value) {
        return Ok(value);
    }

    Err(ValidationError::ValueNotAllowed {
        label,
        value: value.to_owned(),
        allowed: allowed.iter().map(|item| (*item).to_owned()).collect(),
    })
}

/// Expand a shorthand token (`1M`) or accept a canonical one (`ONE_MINUTE`).
pub fn normalize_interval(token: &str) -> Result<Interval, ValidationError> {
    Interval::from_str(token)
}

/// A boundary resolved to the request string and the value it is compared by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub text: String,
    pub at: PrimitiveDateTime,
}

/// Resolve one boundary. Calendar values are formatted; strings are parsed
/// for comparison and passed through untouched.
pub fn resolve_date(
    field: &'static str,
    input: &DateInput,
    format: &DateFormat,
) -> Result<ResolvedDate, ValidationError> {
    match input {
        DateInput::DateTime(at) => Ok(ResolvedDate {
            text: format.format(*at)?,
            at: *at,
        }),
        DateInput::Date(date) => {
            let at = date.midnight();
            Ok(ResolvedDate {
                text: format.format(at)?,
                at,
            })
        }
        DateInput::Text(text) => Ok(ResolvedDate {
            at: format.parse_datetime(field, text)?,
            text: text.clone(),
        }),
    }
}

/// Validated window, both as request strings and as comparable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRange {
    pub from: ResolvedDate,
    pub to: ResolvedDate,
}

impl NormalizedRange {
    pub fn into_strings(self) -> (String, String) {
        (self.from.text, self.to.text)
    }
}

/// Resolve both boundaries and enforce the interval's lookback limit.
///
/// A window whose end precedes its start is rejected; equal boundaries are
/// accepted.
pub fn check_range(
    from: &DateInput,
    to: &DateInput,
    interval: Interval,
    format: &DateFormat,
) -> Result<NormalizedRange, ValidationError> {
    let from = resolve_date("from", from, format)?;
    let to = resolve_date("to", to, format)?;

    let elapsed = to.at - from.at;
    if elapsed.is_negative() {
        return Err(ValidationError::InvertedRange {
            from: from.text,
            to: to.text,
        });
    }

    if elapsed > interval.max_span() {
        return Err(ValidationError::RangeTooLarge {
            interval,
            elapsed_seconds: elapsed.whole_seconds(),
            max_seconds: interval.max_seconds(),
        });
    }

    Ok(NormalizedRange { from, to })
}

/// [`check_range`] reduced to the two request strings.
pub fn normalize_range(
    from: &DateInput,
    to: &DateInput,
    interval: Interval,
    format: &DateFormat,
) -> Result<(String, String), ValidationError> {
    check_range(from, to, interval, format).map(NormalizedRange::into_strings)
}
