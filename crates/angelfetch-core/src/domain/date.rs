use std::fmt::{Debug, Formatter};

use serde::Deserialize;
use serde_json::Value;
use time::format_description::{self, OwnedFormatItem};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::ValidationError;

/// Pattern used both to parse caller strings and to build request strings.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Boundary of a requested window: a calendar value or a preformatted string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum DateInput {
    DateTime(PrimitiveDateTime),
    Date(Date),
    Text(String),
}

impl From<PrimitiveDateTime> for DateInput {
    fn from(value: PrimitiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Date> for DateInput {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

/// The offset is dropped; request strings carry wall-clock time only.
impl From<OffsetDateTime> for DateInput {
    fn from(value: OffsetDateTime) -> Self {
        Self::DateTime(PrimitiveDateTime::new(value.date(), value.time()))
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl TryFrom<Value> for DateInput {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            other => Err(ValidationError::InvalidDateFormat {
                field: "date",
                value: other.to_string(),
            }),
        }
    }
}

/// Compiled date pattern.
///
/// Accepts strftime-style patterns (`%Y-%m-%d %H:%M`) or `time` format
/// descriptions (`[year]-[month]-[day] [hour]:[minute]`). Strftime numeric
/// fields parse with or without a leading zero and always format padded.
#[derive(Clone)]
pub struct DateFormat {
    pattern: String,
    format_items: OwnedFormatItem,
    parse_items: OwnedFormatItem,
    resolution: Duration,
}

impl DateFormat {
    pub fn parse(pattern: &str) -> Result<Self, ValidationError> {
        let (format_description, parse_description) = if pattern.contains('%') {
            (
                strftime_to_description(pattern, Padding::Zero)?,
                strftime_to_description(pattern, Padding::None)?,
            )
        } else {
            (pattern.to_owned(), pattern.to_owned())
        };

        Ok(Self {
            pattern: pattern.to_owned(),
            format_items: compile(pattern, &format_description)?,
            parse_items: compile(pattern, &parse_description)?,
            resolution: resolution_of(&format_description),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Smallest time step the pattern distinguishes.
    pub const fn resolution(&self) -> Duration {
        self.resolution
    }

    pub fn format(&self, value: PrimitiveDateTime) -> Result<String, ValidationError> {
        value
            .format(&self.format_items)
            .map_err(|error| ValidationError::InvalidDateFormatDescription {
                value: self.pattern.clone(),
                reason: error.to_string(),
            })
    }

    /// Parse `text`; patterns without time components resolve to midnight.
    pub fn parse_datetime(
        &self,
        field: &'static str,
        text: &str,
    ) -> Result<PrimitiveDateTime, ValidationError> {
        PrimitiveDateTime::parse(text, &self.parse_items)
            .or_else(|_| Date::parse(text, &self.parse_items).map(Date::midnight))
            .map_err(|_| ValidationError::InvalidDateFormat {
                field,
                value: text.to_owned(),
            })
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_DATE_FORMAT).expect("default date format must compile")
    }
}

impl Debug for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DateFormat").field(&self.pattern).finish()
    }
}

impl PartialEq for DateFormat {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for DateFormat {}

fn resolution_of(description: &str) -> Duration {
    if description.contains("[second") || description.contains("[subsecond") {
        Duration::SECOND
    } else if description.contains("[minute") {
        Duration::MINUTE
    } else if description.contains("[hour") {
        Duration::HOUR
    } else {
        Duration::DAY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Padding {
    Zero,
    None,
}

fn compile(pattern: &str, description: &str) -> Result<OwnedFormatItem, ValidationError> {
    format_description::parse_owned::<2>(description).map_err(|error| {
        ValidationError::InvalidDateFormatDescription {
            value: pattern.to_owned(),
            reason: error.to_string(),
        }
    })
}

fn strftime_to_description(pattern: &str, padding: Padding) -> Result<String, ValidationError> {
    let mut description = String::with_capacity(pattern.len() * 3);
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '%' => {
                let component = match chars.next() {
                    Some('Y') => "year",
                    Some('m') => "month",
                    Some('d') => "day",
                    Some('H') => "hour",
                    Some('M') => "minute",
                    Some('S') => "second",
                    Some('%') => {
                        description.push('%');
                        continue;
                    }
                    other => {
                        return Err(ValidationError::InvalidDateFormatDescription {
                            value: pattern.to_owned(),
                            reason: format!(
                                "unsupported directive '%{}'",
                                other.map(String::from).unwrap_or_default()
                            ),
                        })
                    }
                };
                description.push('[');
                description.push_str(component);
                if padding == Padding::None && component != "year" {
                    description.push_str(" padding:none");
                }
                description.push(']');
            }
            '[' | '\\' => {
                description.push('\\');
                description.push(ch);
            }
            other => description.push(other),
        }
    }

    Ok(description)
}
