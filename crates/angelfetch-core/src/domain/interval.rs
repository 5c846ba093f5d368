use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::validation::validate_enum;
use crate::ValidationError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Candle interval accepted by the historical endpoint.
///
/// Serializes to the canonical API name (`ONE_MINUTE`, ...). Parsing accepts
/// either the canonical name or the shorthand token (`1M`, `1H`, `1D`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Interval {
    OneMinute,
    ThreeMinute,
    FiveMinute,
    TenMinute,
    FifteenMinute,
    ThirtyMinute,
    OneHour,
    OneDay,
}

impl Interval {
    pub const ALL: [Self; 8] = [
        Self::OneMinute,
        Self::ThreeMinute,
        Self::FiveMinute,
        Self::TenMinute,
        Self::FifteenMinute,
        Self::ThirtyMinute,
        Self::OneHour,
        Self::OneDay,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "ONE_MINUTE",
            Self::ThreeMinute => "THREE_MINUTE",
            Self::FiveMinute => "FIVE_MINUTE",
            Self::TenMinute => "TEN_MINUTE",
            Self::FifteenMinute => "FIFTEEN_MINUTE",
            Self::ThirtyMinute => "THIRTY_MINUTE",
            Self::OneHour => "ONE_HOUR",
            Self::OneDay => "ONE_DAY",
        }
    }

    pub const fn shorthand(self) -> &'static str {
        match self {
            Self::OneMinute => "1M",
            Self::ThreeMinute => "3M",
            Self::FiveMinute => "5M",
            Self::TenMinute => "10M",
            Self::FifteenMinute => "15M",
            Self::ThirtyMinute => "30M",
            Self::OneHour => "1H",
            Self::OneDay => "1D",
        }
    }

    /// Maximum number of days a single request may span for this interval.
    pub const fn max_days(self) -> i64 {
        match self {
            Self::OneMinute => 30,
            Self::ThreeMinute => 60,
            Self::FiveMinute | Self::TenMinute => 100,
            Self::FifteenMinute | Self::ThirtyMinute => 200,
            Self::OneHour => 400,
            Self::OneDay => 2000,
        }
    }

    pub const fn max_seconds(self) -> i64 {
        self.max_days() * SECONDS_PER_DAY
    }

    pub const fn max_span(self) -> Duration {
        Duration::days(self.max_days())
    }

    /// Width of one candle.
    pub const fn step(self) -> Duration {
        match self {
            Self::OneMinute => Duration::minutes(1),
            Self::ThreeMinute => Duration::minutes(3),
            Self::FiveMinute => Duration::minutes(5),
            Self::TenMinute => Duration::minutes(10),
            Self::FifteenMinute => Duration::minutes(15),
            Self::ThirtyMinute => Duration::minutes(30),
            Self::OneHour => Duration::hours(1),
            Self::OneDay => Duration::days(1),
        }
    }

    fn from_canonical(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.as_str() == value)
    }

    fn from_shorthand(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.shorthand() == value)
    }

    fn accepted_tokens() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .map(|interval| interval.shorthand())
            .chain(Self::ALL.iter().map(|interval| interval.as_str()))
            .collect()
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = validate_enum("Interval", value, &Self::accepted_tokens())?;
        Self::from_shorthand(token)
            .or_else(|| Self::from_canonical(token))
            .ok_or_else(|| ValidationError::ValueNotAllowed {
                label: "Interval",
                value: token.to_owned(),
                allowed: Self::accepted_tokens().into_iter().map(String::from).collect(),
            })
    }
}

impl TryFrom<String> for Interval {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}
