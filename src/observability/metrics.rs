//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_requests_total` (counter): requests by status and backend
//! - `balancer_request_duration_seconds` (histogram): end-to-end latency
//! - `balancer_backend_health` (gauge): 1=healthy, 0=unhealthy, per backend
//! - `balancer_healthy_backends` (gauge): size of the current healthy set
//! - `balancer_probe_cycle_duration_seconds` (histogram): probe cycle duration

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(status: u16, backend: &str, start: Instant) {
    counter!(
        "balancer_requests_total",
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    histogram!("balancer_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one probe.
pub fn record_backend_health(backend: &str, healthy: bool) {
    gauge!("balancer_backend_health", "backend" => backend.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Record a finished probe cycle.
pub fn record_probe_cycle(healthy: usize, took: Duration) {
    gauge!("balancer_healthy_backends").set(healthy as f64);
    histogram!("balancer_probe_cycle_duration_seconds").record(took.as_secs_f64());
}
