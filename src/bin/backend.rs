//! Demo backend for local runs of the balancer.
//!
//! Answers every path, `/health` included, with 200 and a fixed greeting.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    routing::any,
    Router,
};
use clap::Parser;
use tokio::net::TcpListener;

use edge_balancer::observability::logging;

const GREETING: &str = "Hello from backend server";

#[derive(Debug, Parser)]
#[command(name = "backend")]
#[command(about = "Demo backend that answers every request", long_about = None)]
struct Cli {
    /// Server port.
    #[arg(short, long, default_value_t = 8081)]
    port: u16,
}

async fn serve(ConnectInfo(remote): ConnectInfo<SocketAddr>, request: Request<Body>) -> &'static str {
    tracing::info!(
        remote = %remote,
        method = %request.method(),
        path = %request.uri().path(),
        protocol = ?request.version(),
        "Received request"
    );
    for (name, value) in request.headers() {
        tracing::debug!(header = %name, value = ?value, "Request header");
    }
    tracing::info!(response = GREETING, "Responding");
    GREETING
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init("backend=debug");

    let app = Router::new()
        .route("/", any(serve))
        .route("/{*path}", any(serve));

    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting backend server");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
