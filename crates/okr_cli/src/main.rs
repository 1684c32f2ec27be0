//! `okr` entry point.

use clap::Parser;
use log::error;
use okr_cli::{execute, Cli, CliError};
use okr_core::{init_logging, HttpOkrApi, ObjectiveStore};
use std::process::ExitCode;

const QUIET_LOG_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("okr: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.resolve_config()?;

    let level = if cli.verbose || config.log_dir.is_some() {
        config.log_level.as_str()
    } else {
        QUIET_LOG_LEVEL
    };
    init_logging(level, config.log_dir.as_deref()).map_err(CliError::Logging)?;

    let store = ObjectiveStore::new(HttpOkrApi::from_config(&config)?);
    let mut stdout = std::io::stdout().lock();
    execute(&cli.command, &store, &mut stdout).await
}
