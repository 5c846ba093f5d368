use time::PrimitiveDateTime;

use crate::domain::{DateFormat, Interval};
use crate::ValidationError;

/// One request-sized slice of a longer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: PrimitiveDateTime,
    pub to: PrimitiveDateTime,
}

impl Window {
    pub fn format(&self, format: &DateFormat) -> Result<(String, String), ValidationError> {
        Ok((format.format(self.from)?, format.format(self.to)?))
    }
}

/// Split `[from, to]` into consecutive windows that each fit the interval's
/// lookback limit. Each window starts one candle after the previous one
/// ends, so no candle is requested twice. Returns nothing when `to < from`.
pub fn plan_chunks(from: PrimitiveDateTime, to: PrimitiveDateTime, interval: Interval) -> Vec<Window> {
    let mut windows = Vec::new();
    let mut start = from;

    while start <= to {
        let end = start
            .checked_add(interval.max_span())
            .map_or(to, |end| end.min(to));
        windows.push(Window { from: start, to: end });

        match end.checked_add(interval.step()) {
            Some(next) => start = next,
            None => break,
        }
    }

    windows
}

/// [`plan_chunks`] rendered with `format`.
///
/// The pattern must resolve at least one candle width, otherwise the start
/// of a window would print the same text as the end of the one before it.
pub fn plan_formatted(
    from: PrimitiveDateTime,
    to: PrimitiveDateTime,
    interval: Interval,
    format: &DateFormat,
) -> Result<Vec<(String, String)>, ValidationError> {
    if format.resolution() > interval.step() {
        return Err(ValidationError::CoarseDatePattern {
            pattern: format.pattern().to_owned(),
            interval,
        });
    }

    plan_chunks(from, to, interval)
        .iter()
        .map(|window| window.format(format))
        .collect()
}
