//! `okr-server` entry point.

use clap::Parser;
use log::{error, info};
use okr_core::db::{open_location, DbLocation};
use okr_core::{init_logging, DashboardConfig, OkrService, SqliteObjectiveRepository};
use okr_server::{serve, AppState};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "okr-server", version, about = "Serve the OKR REST API")]
struct Args {
    /// TOML config file; `OKR_*` variables override it.
    #[arg(long, env = "OKR_CONFIG")]
    config: Option<PathBuf>,
    /// Listen address, overrides `bind_addr`.
    #[arg(long)]
    bind: Option<String>,
    /// Insert demo objectives when the database is empty.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_start module=server status=error error={err}");
            eprintln!("okr-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    config.seed_demo_data |= args.seed;

    init_logging(&config.log_level, config.log_dir.as_deref())?;
    let location = DbLocation::from_path(config.db_path.as_deref());
    info!(
        "event=server_start module=server status=starting core_version={} db={location}",
        okr_core::core_version()
    );

    let conn = open_location(&location)?;
    let mut service = OkrService::new(SqliteObjectiveRepository::try_new(conn)?);
    if config.seed_demo_data {
        let inserted = service.seed_if_empty()?;
        info!("event=server_seed module=server status=ok inserted={inserted}");
    }

    let listener = TcpListener::bind(&config.bind_addr).await?;
    serve(listener, AppState::new(service)).await?;
    Ok(())
}
