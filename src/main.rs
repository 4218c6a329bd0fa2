//! Traefik Config Manager
//!
//! REST service that edits an application's Traefik dynamic configuration in
//! Dokploy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶  http (axum, CORS, request id)
//!                          │
//!                          ▼
//!                      operations (defaults + overrides → plan)
//!                          │
//!              ┌───────────┴────────────┐
//!              ▼                        ▼
//!          store (Dokploy API)      document (line editor)
//!          read / write              insert / remove / extract
//!
//!     Cross-cutting: config, observability, resilience, lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use traefik_config_manager::config::load_or_default;
use traefik_config_manager::observability::{logging, metrics};
use traefik_config_manager::store::DokployStore;
use traefik_config_manager::HttpServer;

#[derive(Parser)]
#[command(name = "traefik-config-manager", version)]
#[command(about = "REST service managing Traefik host routing in Dokploy", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(&args.config)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("traefik-config-manager v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_domain = %config.store.api_domain,
        app = %config.store.application_id,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(DokployStore::new(&config.timeouts, &config.retries)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, store);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
