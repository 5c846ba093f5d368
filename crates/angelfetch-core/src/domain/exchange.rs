use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::validate_enum;
use crate::ValidationError;

/// Exchange segments served by the historical candle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Exchange {
    Nse,
    Nfo,
    Bse,
    Bfo,
    Mcx,
    Cds,
}

impl Exchange {
    pub const ALL: [Self; 6] = [
        Self::Nse,
        Self::Nfo,
        Self::Bse,
        Self::Bfo,
        Self::Mcx,
        Self::Cds,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Nfo => "NFO",
            Self::Bse => "BSE",
            Self::Bfo => "BFO",
            Self::Mcx => "MCX",
            Self::Cds => "CDS",
        }
    }

    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|exchange| exchange.as_str()).collect()
    }
}

impl Display for Exchange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = validate_enum("Exchange", value, &Self::codes())?;
        Self::ALL
            .into_iter()
            .find(|exchange| exchange.as_str() == code)
            .ok_or_else(|| ValidationError::ValueNotAllowed {
                label: "Exchange",
                value: code.to_owned(),
                allowed: Self::codes().into_iter().map(String::from).collect(),
            })
    }
}

impl TryFrom<String> for Exchange {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}
