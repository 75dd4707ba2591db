//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every configured backend
//! - Rebuild the healthy set and swap it into the registry

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use futures_util::future::join_all;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::HealthCheckConfig;
use crate::load_balancer::{Backend, Registry, Snapshot};
use crate::observability::metrics;

/// Why a single probe declared its backend unhealthy.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build probe request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("connection error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("probe task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Outcome of probing one backend in one cycle.
#[derive(Debug)]
pub struct ProbeReport {
    pub backend: Backend,
    pub result: Result<(), ProbeError>,
}

impl ProbeReport {
    pub fn is_healthy(&self) -> bool {
        self.result.is_ok()
    }
}

/// Periodically probes the configured backends and publishes the healthy set.
#[derive(Debug, Clone)]
pub struct HealthProber {
    backends: Arc<[Backend]>,
    registry: Arc<Registry>,
    config: HealthCheckConfig,
    client: Client<HttpConnector, Body>,
}

impl HealthProber {
    pub fn new(backends: Vec<Backend>, registry: Arc<Registry>, config: HealthCheckConfig) -> Self {
        // One connection per probe so a dead backend never hides behind an idle socket.
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpConnector::new());

        Self {
            backends: backends.into(),
            registry,
            config,
            client,
        }
    }

    /// Run one probe cycle and swap the result into the registry.
    pub async fn run_cycle(&self) -> Snapshot {
        let started = Instant::now();

        let probes = self.backends.iter().cloned().map(|backend| {
            let client = self.client.clone();
            let path = self.config.path.clone();
            let timeout = self.config.timeout();
            tokio::spawn(probe(client, backend, path, timeout))
        });
        let joined = join_all(probes).await;

        let reports: Vec<ProbeReport> = joined
            .into_iter()
            .zip(self.backends.iter())
            .map(|(joined, backend)| {
                joined.unwrap_or_else(|e| ProbeReport {
                    backend: backend.clone(),
                    result: Err(e.into()),
                })
            })
            .collect();

        let healthy = healthy_set(&reports);
        self.registry.swap(healthy);
        let snapshot = self.registry.snapshot();

        let elapsed = started.elapsed();
        metrics::record_probe_cycle(snapshot.len(), elapsed);
        let names: Vec<&str> = snapshot.iter().map(Backend::authority).collect();
        tracing::info!(
            healthy = ?names,
            configured = self.backends.len(),
            took = ?elapsed,
            "Healthy backends"
        );
        snapshot
    }

    /// Probe on every interval tick, forever.
    ///
    /// The first tick fires one interval from now; the startup cycle is
    /// expected to have been run with [`HealthProber::run_cycle`] already.
    pub async fn run(self) {
        let interval = self.config.interval();
        tracing::info!(
            interval = ?interval,
            path = %self.config.path,
            backends = self.backends.len(),
            "Health prober starting"
        );

        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// Spawn [`HealthProber::run`] as the background probing task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

/// Configured order, filtered to backends whose probe succeeded.
fn healthy_set(reports: &[ProbeReport]) -> Vec<Backend> {
    reports
        .iter()
        .filter(|r| r.is_healthy())
        .map(|r| r.backend.clone())
        .collect()
}

async fn probe(
    client: Client<HttpConnector, Body>,
    backend: Backend,
    path: String,
    timeout: Duration,
) -> ProbeReport {
    let started = Instant::now();
    let result = check(&client, &backend, &path, timeout).await;
    let latency = started.elapsed();

    match &result {
        Ok(()) => {
            tracing::debug!(backend = %backend, latency = ?latency, "Health check succeeded")
        }
        Err(e) => {
            tracing::warn!(backend = %backend, latency = ?latency, error = %e, "Health check failed")
        }
    }
    metrics::record_backend_health(backend.authority(), result.is_ok());

    ProbeReport { backend, result }
}

async fn check(
    client: &Client<HttpConnector, Body>,
    backend: &Backend,
    path: &str,
    timeout: Duration,
) -> Result<(), ProbeError> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(backend.uri(path)?)
        .header(header::USER_AGENT, "edge-balancer-health-check")
        .body(Body::empty())?;

    let response = time::timeout(timeout, client.request(request))
        .await
        .map_err(|_| ProbeError::Timeout(timeout))??;

    match response.status() {
        StatusCode::OK => Ok(()),
        status => Err(ProbeError::Status(status)),
    }
}
