use angelfetch_core::Interval;
use serde_json::{json, Value};

use crate::error::CliError;

use super::{labels, CommandResult};

pub fn run() -> Result<CommandResult, CliError> {
    let data = Interval::ALL
        .iter()
        .map(|interval| {
            json!({
                "shorthand": interval.shorthand(),
                "interval": interval.as_str(),
                "max_days": interval.max_days(),
            })
        })
        .collect::<Vec<_>>();

    let rows = Interval::ALL
        .iter()
        .map(|interval| {
            vec![
                Value::from(interval.shorthand()),
                Value::from(interval.as_str()),
                Value::from(interval.max_days()),
            ]
        })
        .collect();

    Ok(CommandResult::new(
        Value::Array(data),
        labels(&["shorthand", "interval", "max_days"]),
        rows,
    ))
}
