/*
newsdigest - main.rs
Starts the Rocket HTTP server that serves the digest UI and JSON API.
*/

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use newsdigest::bootstrap::{build_services, load_config, load_dotenv};
use newsdigest::server::launch_rocket;
use newsdigest::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "newsdigest", about = "News digest web UI: fetch, de-duplicate and summarize articles")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_file.as_deref())?;

    // Credentials may come from a .env file in the working directory
    load_dotenv();

    let config = match load_config(Path::new("."), args.config).await {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };

    let services = build_services(&config)?;
    for problem in &services.errors {
        warn!(%problem, "starting with a configuration problem; the UI will report it");
    }

    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(Arc::new(config), services).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
