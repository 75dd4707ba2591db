//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Health prober
//!     → registry.rs (swap in the new healthy set)
//!
//! Inbound request
//!     → selector.rs (take one snapshot from the registry)
//!     → Apply the configured policy:
//!         - round_robin.rs (shared cursor modulo snapshot length)
//!         - random.rs (uniform pick)
//!     → Selected backend or NoHealthyBackends
//! ```
//!
//! # Design Decisions
//! - One policy per process, chosen at startup
//! - Request handlers only read the registry; the prober is the only writer
//! - Policies index into the exact snapshot they were given

pub mod backend;
pub mod random;
pub mod registry;
pub mod round_robin;
pub mod selector;

use std::fmt::Debug;

pub use backend::{AuthorityError, Backend};
pub use registry::{Registry, Snapshot};
pub use selector::{SelectError, Selector};

/// A backend selection policy.
pub trait LoadBalancer: Send + Sync + Debug {
    /// Pick one backend out of `backends`, or `None` when it is empty.
    fn next_server(&self, backends: &[Backend]) -> Option<Backend>;
}
