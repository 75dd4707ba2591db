//! HTTP load balancer with active health checks.

pub mod config;
pub mod health;
pub mod http;
pub mod load_balancer;
pub mod observability;

pub use config::{BalancerConfig, LoadedConfig};
pub use http::HttpServer;
pub use load_balancer::{Backend, Registry, Selector};
