//! # Domain Models
//!
//! Strongly-typed values for historical candle requests.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Exchange`] | Exchange segment allow-list (NSE, NFO, BSE, BFO, MCX, CDS) |
//! | [`Interval`] | Candle interval with shorthand tokens and lookback limits |
//! | [`Instrument`] | Exchange + symbol token pair |
//! | [`SymbolToken`] | Opaque broker instrument identifier |
//! | [`DateInput`] | Window boundary as a calendar value or string |
//! | [`DateFormat`] | Pattern used to parse and build request dates |
//! | [`CandleRow`] | Raw six-cell candle as returned by the broker |
//! | [`Candle`] | Typed OHLCV candle |
//!
//! Construction validates every invariant; parsing failures surface as
//! [`ValidationError`](crate::ValidationError).

mod candle;
mod date;
mod exchange;
mod instrument;
mod interval;

pub use candle::{Candle, CandleRow, CANDLE_FIELDS};
pub use date::{DateFormat, DateInput, DEFAULT_DATE_FORMAT};
pub use exchange::Exchange;
pub use instrument::{Instrument, SymbolToken};
pub use interval::Interval;
