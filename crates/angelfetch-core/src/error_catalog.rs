use std::collections::BTreeMap;
use std::path::Path;

use crate::CoreError;

/// Fallback description for codes the catalog does not know.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

const EMBEDDED_CATALOG: &str = include_str!("../config/angelone_errors.json");

/// Brokerage error code → human-readable description.
///
/// Built once at startup, either from the copy compiled into the crate or
/// from a JSON object file, and passed to whoever renders errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorCatalog {
    entries: BTreeMap<String, String>,
}

impl ErrorCatalog {
    pub fn embedded() -> Self {
        Self::from_json_str(EMBEDDED_CATALOG).expect("embedded error catalog must be valid JSON")
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str::<BTreeMap<String, String>>(json)?;
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&contents)?)
    }

    /// Load from `path` when given, otherwise use the embedded table.
    pub fn resolve(path: Option<&Path>) -> Result<Self, CoreError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::embedded()),
        }
    }

    pub fn message(&self, code: &str) -> &str {
        self.entries
            .get(code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ERROR)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, message)| (code.as_str(), message.as_str()))
    }
}
