//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: one cycle, awaited before the listener accepts
//! Periodic timer (interval)
//!     → prober.rs: probe every configured backend in parallel
//!     → join all results
//!     → filter configured list by result (order preserved)
//!     → Registry::swap
//! ```
//!
//! # Design Decisions
//! - Membership is recomputed from scratch every cycle, no thresholds
//! - Probe failures never leave this module except as set membership
//! - A slow backend bounds the cycle, not the other probes

pub mod prober;

pub use prober::{HealthProber, ProbeError, ProbeReport};
