//! Log ingestion service (v1)
//!
//! Accepts structured log entries over HTTP, assigns each an id and a server
//! timestamp, and stores it in Elasticsearch.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     LOG INGEST                        │
//!   POST/GET      │  ┌─────────┐    ┌──────────┐    ┌──────────────┐     │
//!  ───────────────┼─▶│  http   │───▶│  ingest  │───▶│    store     │─────┼──▶ Elasticsearch
//!                 │  │ server  │    │ service  │    │ (LogStore)   │     │
//!  ◀──────────────┼──│ + error │◀───│ id + ts  │◀───│ classify     │◀────┼───
//!                 │  └─────────┘    └──────────┘    └──────────────┘     │
//!                 │                                                       │
//!                 │  ┌─────────┐ ┌──────────────┐ ┌───────────┐           │
//!                 │  │ config  │ │observability │ │ lifecycle │           │
//!                 │  └─────────┘ └──────────────┘ └───────────┘           │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use log_ingest::config::{load_config, validate_config, ConfigError, ServiceConfig};
use log_ingest::http::HttpServer;
use log_ingest::lifecycle::{self, Shutdown};
use log_ingest::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "log-ingest")]
#[command(about = "HTTP log ingestion service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = ServiceConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("log-ingest v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        store_backend = ?config.store.backend,
        store_url = %config.store.url,
        index = %config.store.index,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    // One store handle for the whole process.
    let service = lifecycle::build_service(&config.store).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    HttpServer::new(config, service)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
