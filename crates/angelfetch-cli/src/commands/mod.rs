mod error_code;
mod history;
mod intervals;
mod plan;

use std::path::Path;

use angelfetch_core::ErrorCatalog;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Output of one command: `data` is printed as JSON, `columns` and `rows`
/// back the table and CSV renderings.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub data: Value,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl CommandResult {
    pub fn new(data: Value, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            data,
            columns,
            rows,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::History(args) => history::run(args).await,
        Command::Plan(args) => plan::run(args),
        Command::Intervals => intervals::run(),
        Command::ErrorCode(args) => error_code::run(args),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<ErrorCatalog, CliError> {
    ErrorCatalog::resolve(path).map_err(CliError::Catalog)
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}
