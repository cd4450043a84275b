//! Startup orchestration.
//!
//! # Responsibilities
//! - Re-validate the final configuration
//! - Start the metrics exporter when enabled
//! - Build the selected service
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::loader::ConfigError;
use crate::config::validation::validate_config;
use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::inference::InferenceError;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("inference client error: {0}")]
    Inference(#[from] InferenceError),

    #[error("metrics exporter error: {0}")]
    Metrics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run `config.service` until SIGINT/SIGTERM.
///
/// The config is validated again here since command-line flags may have
/// changed it after loading.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e| StartupError::Metrics(format!("{}", e)))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let shutdown = Shutdown::new();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, shutdown.clone())?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    signals::spawn_signal_listener(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
