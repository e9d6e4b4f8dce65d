mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let envelope = commands::run(&cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if envelope
        .errors
        .iter()
        .any(|error| error.code == commands::CODE_RACE_TIMED_OUT)
    {
        return Ok(ExitCode::from(4));
    }
    if envelope
        .errors
        .iter()
        .any(|error| error.code == commands::CODE_RACE_ALL_FAILED)
    {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
