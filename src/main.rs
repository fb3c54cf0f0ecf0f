//! Document Gateway
//!
//! Serves `GET /documents/{date}` while shielding the upstream document source
//! from overload.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                   DOCUMENT GATEWAY                    │
//!   GET /documents/{d}   │  ┌─────────┐   ┌────────────┐   ┌──────────────────┐ │
//!  ──────────────────────┼─▶│  http   │──▶│ documents  │──▶│   resilience     │ │
//!                        │  │ server  │   │  service   │   │ limiter → retry  │ │
//!                        │  └─────────┘   └────────────┘   └────────┬─────────┘ │
//!                        │                                           │           │
//!                        │                                           ▼           │
//!   200 / 400 / 500 / 504│                                  ┌──────────────────┐ │    Upstream
//!  ◀─────────────────────┼──────────────────────────────────│    upstream      │◀┼──── source
//!                        │                                  │ static | http    │ │
//!                        │                                  └──────────────────┘ │
//!                        │  Cross-cutting: config · observability · lifecycle    │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use document_gateway::config::{load_config, validate_config, GatewayConfig};
use document_gateway::lifecycle::signals::termination_signal;
use document_gateway::observability::{logging, metrics};
use document_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "document-gateway")]
#[command(about = "Rate-limited gateway for date-indexed document lists", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 0.0.0.0:8000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })?;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("document-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        capacity = config.rate_limit.capacity,
        period_secs = config.rate_limit.period_secs,
        max_attempts = config.retries.max_attempts,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::from_config(&config)?;
    server.run(listener, termination_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
