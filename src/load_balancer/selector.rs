//! Per-request backend selection.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Policy;
use crate::load_balancer::{
    random::Random, registry::Registry, round_robin::RoundRobin, Backend, LoadBalancer,
};

/// Selection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The registry currently holds no healthy backend.
    #[error("no healthy backends available")]
    NoHealthyBackends,
}

/// Applies the configured policy to the registry's current snapshot.
#[derive(Debug, Clone)]
pub struct Selector {
    registry: Arc<Registry>,
    policy: Arc<dyn LoadBalancer>,
}

impl Selector {
    pub fn new(registry: Arc<Registry>, policy: Policy) -> Self {
        let policy: Arc<dyn LoadBalancer> = match policy {
            Policy::RoundRobin => Arc::new(RoundRobin::new()),
            Policy::Random => Arc::new(Random::new()),
        };
        Self { registry, policy }
    }

    /// Select a backend for one request.
    ///
    /// The snapshot is taken once and used for both the length and the lookup.
    pub fn select(&self) -> Result<Backend, SelectError> {
        let snapshot = self.registry.snapshot();
        match self.policy.next_server(&snapshot) {
            Some(backend) => Ok(backend),
            None => {
                tracing::debug!(healthy = snapshot.len(), "No healthy backends found");
                Err(SelectError::NoHealthyBackends)
            }
        }
    }
}
