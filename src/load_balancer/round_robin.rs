//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::{backend::Backend, LoadBalancer};

/// Round-robin selector.
/// Stores an internal cursor to rotate through backends.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, backends: &[Backend]) -> Option<Backend> {
        if backends.is_empty() {
            return None;
        }

        // fetch_add wraps on overflow, so the cursor never needs a reset.
        let cursor = self.cursor.fetch_add(1, Ordering::Relaxed);
        backends.get(cursor % backends.len()).cloned()
    }
}
