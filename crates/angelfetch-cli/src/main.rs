mod cli;
mod commands;
mod error;
mod obs;
mod output;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    obs::init_tracing(&cli.log_level, cli.log_format)?;

    let result = commands::run(&cli).await?;
    output::render(&result, cli.format, cli.pretty)
}
