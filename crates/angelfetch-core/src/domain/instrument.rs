use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Exchange;
use crate::ValidationError;

/// Opaque broker-assigned instrument identifier (e.g. `99926000` for NIFTY 50).
///
/// Tokens for derivatives change with every expiry, so beyond being
/// non-empty no structure is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolToken(String);

impl SymbolToken {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbolToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SymbolToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SymbolToken {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for SymbolToken {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SymbolToken> for String {
    fn from(value: SymbolToken) -> Self {
        value.0
    }
}

/// Exchange and symbol token pair a fetcher is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub exchange: Exchange,
    pub symbol_token: SymbolToken,
}

impl Instrument {
    pub fn new(exchange: Exchange, symbol_token: SymbolToken) -> Self {
        Self {
            exchange,
            symbol_token,
        }
    }

    /// Validate both parts from their raw string forms, exchange first.
    pub fn parse(exchange: &str, symbol_token: &str) -> Result<Self, ValidationError> {
        let exchange = Exchange::from_str(exchange)?;
        let symbol_token = SymbolToken::parse(symbol_token)?;
        Ok(Self::new(exchange, symbol_token))
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.exchange, self.symbol_token)
    }
}
