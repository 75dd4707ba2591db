//! Registry of currently healthy backends.
//!
//! # Responsibilities
//! - Own the healthy set, shared by the prober (writer) and request handlers (readers)
//! - Hand out immutable snapshots
//! - Replace the whole set atomically at the end of a probe cycle

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::load_balancer::backend::Backend;

/// Point-in-time view of the healthy set.
///
/// Holding a snapshot never blocks a swap and a swap never mutates a
/// snapshot that is already held.
pub type Snapshot = Arc<Vec<Backend>>;

/// Shared, atomically swappable healthy set.
#[derive(Debug)]
pub struct Registry {
    healthy: ArcSwap<Vec<Backend>>,
}

impl Registry {
    /// An empty registry. Nothing is routable until the first swap.
    pub fn new() -> Self {
        Self {
            healthy: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Current healthy set.
    pub fn snapshot(&self) -> Snapshot {
        self.healthy.load_full()
    }

    /// Replace the healthy set; readers see either the old set or this one.
    pub fn swap(&self, healthy: Vec<Backend>) -> Snapshot {
        self.healthy.swap(Arc::new(healthy))
    }

    pub fn len(&self) -> usize {
        self.healthy.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
