//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs)
//!     → command-line flags (cli.rs)
//!     → validation.rs (semantic checks, backend parsing)
//!     → LoadedConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Any configuration error is fatal at startup

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, load_from_cli, ConfigError, LoadedConfig};
pub use schema::{
    BalancerConfig, ForwardConfig, ForwardMode, HealthCheckConfig, ListenerConfig,
    ObservabilityConfig, Policy,
};
pub use validation::ValidationError;
