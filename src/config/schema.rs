//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the balancer.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the balancer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Candidate backend authorities, in round-robin order.
    pub backends: Vec<String>,

    /// Selection policy.
    pub policy: Policy,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Outbound forwarding settings.
    pub forward: ForwardConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backends: vec!["localhost:8081".to_string(), "localhost:8082".to_string()],
            policy: Policy::default(),
            health_check: HealthCheckConfig::default(),
            forward: ForwardConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind on.
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Backend selection policy, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    #[default]
    RoundRobin,
    Random,
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Probe cycle period in milliseconds.
    pub interval_ms: u64,

    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Path probed on every backend.
    pub path: String,
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            timeout_ms: 2_000,
            path: "/health".to_string(),
        }
    }
}

/// How an inbound request is turned into the outbound one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ForwardMode {
    /// `GET /` on the backend, whatever the client asked for.
    #[default]
    Root,
    /// Same method, path, query, headers and body as the inbound request.
    PassThrough,
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    pub mode: ForwardMode,

    /// Deadline in milliseconds for the outbound call including the body read.
    /// 0 disables it.
    pub timeout_ms: u64,
}

impl ForwardConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            mode: ForwardMode::Root,
            timeout_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Prometheus exporter address; disabled when unset.
    pub metrics_address: Option<String>,
}
