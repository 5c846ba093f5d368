use std::path::PathBuf;

use angelfetch_core::ErrorCatalog;
use serde_json::{json, Value};

use crate::cli::ErrorCodeArgs;
use crate::error::CliError;

use super::{labels, load_catalog, CommandResult};

const CATALOG_ENV: &str = "SMARTAPI_ERROR_CATALOG";

pub fn run(args: &ErrorCodeArgs) -> Result<CommandResult, CliError> {
    let path = args
        .catalog
        .clone()
        .or_else(|| std::env::var_os(CATALOG_ENV).map(PathBuf::from));
    describe(args, load_catalog(path.as_deref())?)
}

fn describe(args: &ErrorCodeArgs, catalog: ErrorCatalog) -> Result<CommandResult, CliError> {
    let description = catalog.message(&args.code);
    let data = json!({
        "code": args.code,
        "description": description,
        "known": catalog.contains(&args.code),
    });

    Ok(CommandResult::new(
        data,
        labels(&["code", "description"]),
        vec![vec![Value::from(args.code.as_str()), Value::from(description)]],
    ))
}
