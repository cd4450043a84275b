//! Demo services launcher.
//!
//! Runs exactly one service per process:
//!
//! ```text
//! demo-services --service hello            GET /, /api/hello, /static/*
//! demo-services --service fruits           GET/POST /fruits   {name}
//! demo-services --service fruits-detailed  GET/POST /fruits   {name, color, weight}
//! demo-services --service users            /users CRUD, /health
//! demo-services --service chat             GET /, /ws relay, /health
//! ```
//!
//! Configuration comes from an optional TOML file plus the
//! `HUGGINGFACE_API_TOKEN` and `MODEL_ID` environment variables.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use demo_services::config::loader::{load_with_overrides, Overrides};
use demo_services::config::ServiceKind;
use demo_services::lifecycle::startup;
use demo_services::observability::logging;

#[derive(Parser)]
#[command(name = "demo-services")]
#[command(about = "Minimal HTTP demo services", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service to run (overrides the config file).
    #[arg(short, long, value_enum)]
    service: Option<ServiceKind>,

    /// Bind address (overrides the config file).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = Overrides {
        service: cli.service,
        bind_address: cli.bind,
    };
    let config = match load_with_overrides(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service,
        bind_address = %config.listener.bind_address,
        "demo-services starting"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Service failed");
            ExitCode::FAILURE
        }
    }
}
