//! Short-link edge handler.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────┐
//!                      │                  SHORTLINK EDGE                    │
//!                      │                                                    │
//!   Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────────┐   │
//!   ───────────────────┼─▶│  http   │───▶│ routing │───▶│ admin gate / │   │
//!                      │  │ server  │    │         │    │   resolver   │   │
//!                      │  └─────────┘    └─────────┘    └──────┬───────┘   │
//!                      │                                       │           │
//!                      │                                       ▼           │
//!   Client Response    │  ┌─────────┐                   ┌──────────────┐   │
//!   ◀──────────────────┼──│response │◀──────────────────│   backend    │◀──┼── Link
//!                      │  │ / pages │                   │    client    │   │   Backend
//!                      │  └─────────┘                   └──────────────┘   │
//!                      │                                                    │
//!                      │   config · observability · lifecycle               │
//!                      └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use shortlink_edge::config::{self, validation::config_warnings};
use shortlink_edge::lifecycle::{wait_for_termination, Shutdown};
use shortlink_edge::observability::{logging, metrics};
use shortlink_edge::admin::AdminAuth;
use shortlink_edge::EdgeServer;

#[derive(Parser)]
#[command(name = "shortlink-edge")]
#[command(about = "Edge handler for a short-link backend", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("shortlink-edge v{} starting", env!("CARGO_PKG_VERSION"));

    for warning in config_warnings(&config) {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_configured = config.backend.base_url.is_some(),
        admin_auth = AdminAuth::from_config(&config.admin).is_enabled(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    let server = EdgeServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
