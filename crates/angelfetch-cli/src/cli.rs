//! CLI argument definitions for angelfetch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `history` | Log in and fetch historical candles |
//! | `plan` | Split a long window into request-sized chunks |
//! | `intervals` | List intervals and their lookback limits |
//! | `error-code` | Describe a broker error code |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-level` | `warn` | Log filter, overridden by `ANGELFETCH_LOG` |
//! | `--log-format` | `text` | Log format on stderr (text, json) |
//!
//! # Examples
//!
//! ```bash
//! # Thirty minutes of NIFTY 50 one-minute candles
//! angelfetch history --exchange NSE --token 99926000 --interval 1M \
//!     --from "2025-01-10 15:00" --to "2025-01-10 15:30"
//!
//! # A full year of minute candles, fetched chunk by chunk
//! angelfetch history --exchange NSE --token 99926000 --interval 1M \
//!     --from "2024-01-01 00:00" --to "2024-12-31 00:00" --chunked --format csv
//!
//! # Which windows would be requested
//! angelfetch plan --interval 1M --from "2024-01-01 00:00" --to "2024-12-31 00:00"
//! ```

use std::path::PathBuf;

use angelfetch_core::DEFAULT_DATE_FORMAT;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Historical candle data from Angel One SmartAPI.
#[derive(Debug, Parser)]
#[command(
    name = "angelfetch",
    author,
    version,
    about = "Historical candle data from Angel One SmartAPI",
    long_about = "angelfetch validates historical candle requests locally and fetches them \
from Angel One SmartAPI.\n\
\n\
Credentials are read from ANGELONE_USERNAME, ANGELONE_PASSWORD and either \
SMARTAPI_TOTP_SECRET (base32 seed) or SMARTAPI_TOTP (current code); \
the API key from SMARTAPI_API_KEY."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log filter directive; `ANGELFETCH_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch historical candles for one instrument.
    History(HistoryArgs),
    /// Print the request windows a long range would be split into.
    Plan(PlanArgs),
    /// List supported intervals with their lookback limits.
    Intervals,
    /// Describe a broker error code.
    ErrorCode(ErrorCodeArgs),
}

/// Interval and window shared by `history` and `plan`.
#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Interval token, shorthand (`1M`) or canonical (`ONE_MINUTE`).
    #[arg(long)]
    pub interval: String,

    /// Window start, written in `--date-format`.
    #[arg(long)]
    pub from: String,

    /// Window end, written in `--date-format`.
    #[arg(long)]
    pub to: String,

    /// strftime pattern or `time` format description for both boundaries.
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    /// Exchange segment (NSE, NFO, BSE, BFO, MCX, CDS).
    #[arg(long)]
    pub exchange: String,

    /// Broker symbol token of the instrument.
    #[arg(long)]
    pub token: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Six comma-separated column labels for the returned rows.
    #[arg(long, value_delimiter = ',', conflicts_with = "typed")]
    pub columns: Option<Vec<String>>,

    /// Parse rows into typed candles with numeric prices.
    #[arg(long, default_value_t = false)]
    pub typed: bool,

    /// Split a window past the interval limit into sequential requests.
    #[arg(long, default_value_t = false)]
    pub chunked: bool,
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ErrorCodeArgs {
    /// Broker error code, e.g. AG8001.
    pub code: String,

    /// Catalog file to use instead of `SMARTAPI_ERROR_CATALOG` or the built-in table.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
