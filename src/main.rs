//! HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 EDGE BALANCER                │
//!                        │                                              │
//!   Client Request       │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│ selector │───▶│ forward │──┼──▶ Backend
//!                        │  │ server  │    └────┬─────┘    └────┬────┘  │
//!   Client Response      │  │         │         │ snapshot      │       │
//!   ◀────────────────────┼──│         │◀────────┼───────────────┘       │
//!                        │  └─────────┘    ┌────┴─────┐                 │
//!                        │                 │ registry │◀── swap ──┐     │
//!                        │                 └──────────┘           │     │
//!                        │                              ┌─────────┴──┐  │
//!                        │                              │   health   │──┼──▶ GET /health
//!                        │                              │   prober   │  │
//!                        │                              └────────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use edge_balancer::config::{load_from_cli, Cli};
use edge_balancer::observability::{logging, metrics};
use edge_balancer::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(logging::DEFAULT_FILTER);

    tracing::info!("edge-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    let loaded = match load_from_cli(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        bind_address = %loaded.config.listener.bind_address(),
        backends = ?loaded.config.backends,
        interval = ?loaded.config.health_check.interval(),
        "Configuration loaded"
    );

    if let Some(addr) = &loaded.config.observability.metrics_address {
        match addr.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(metrics_address = %addr, "Failed to parse metrics address"),
        }
    }

    let listener = TcpListener::bind(loaded.config.listener.bind_address()).await?;

    let server = HttpServer::new(loaded);
    server.run(listener).await?;

    Ok(())
}
