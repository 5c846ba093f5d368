use angelfetch_core::{normalize_interval, plan_formatted, DateFormat, Interval, ValidationError};
use serde_json::{json, Value};

use crate::cli::{PlanArgs, WindowArgs};
use crate::error::CliError;

use super::{labels, CommandResult};

pub fn run(args: &PlanArgs) -> Result<CommandResult, CliError> {
    let format = DateFormat::parse(&args.window.date_format)?;
    let interval = normalize_interval(&args.window.interval)?;
    let windows = windows(&args.window, interval, &format)?;

    let data = json!({
        "interval": interval.as_str(),
        "windows": windows
            .iter()
            .map(|(from, to)| json!({ "from": from, "to": to }))
            .collect::<Vec<_>>(),
    });
    let rows = windows
        .into_iter()
        .map(|(from, to)| vec![Value::from(from), Value::from(to)])
        .collect();

    Ok(CommandResult::new(data, labels(&["from", "to"]), rows))
}

/// Request-sized windows covering `window`, formatted with `format`.
pub(super) fn windows(
    window: &WindowArgs,
    interval: Interval,
    format: &DateFormat,
) -> Result<Vec<(String, String)>, ValidationError> {
    let from = format.parse_datetime("from", &window.from)?;
    let to = format.parse_datetime("to", &window.to)?;
    if to < from {
        return Err(ValidationError::InvertedRange {
            from: window.from.clone(),
            to: window.to.clone(),
        });
    }

    plan_formatted(from, to, interval, format)
}
