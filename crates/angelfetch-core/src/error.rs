use thiserror::Error;

use crate::client::ClientError;
use crate::domain::Interval;
use crate::output::CoercionError;

/// Validation and configuration errors raised before any network access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{label} value `{value}` not in: [{}]", allowed.join(", "))]
    ValueNotAllowed {
        label: &'static str,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{field} date is not in a valid format: '{value}'")]
    InvalidDateFormat { field: &'static str, value: String },
    #[error("invalid date format description '{value}': {reason}")]
    InvalidDateFormatDescription { value: String, reason: String },

    #[error("time period exceeds the limit for {interval}: {elapsed_seconds}s > {max_seconds}s")]
    RangeTooLarge {
        interval: Interval,
        elapsed_seconds: i64,
        max_seconds: i64,
    },
    #[error("to date '{to}' precedes from date '{from}'")]
    InvertedRange { from: String, to: String },
    #[error("date format '{pattern}' is too coarse to split {interval} windows")]
    CoarseDatePattern { pattern: String, interval: Interval },

    #[error("symbol token cannot be empty")]
    EmptySymbolToken,

    #[error("required setting '{name}' is not set")]
    MissingSetting { name: &'static str },
    #[error("setting '{name}' has an invalid value: '{value}'")]
    InvalidSetting { name: &'static str, value: String },
}

impl ValidationError {
    /// True for allow-list and settings failures, which the caller fixes by
    /// correcting configuration rather than the requested window.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ValueNotAllowed { .. } | Self::MissingSetting { .. } | Self::InvalidSetting { .. }
        )
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
