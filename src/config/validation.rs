//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend authorities and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::BalancerConfig;
use crate::load_balancer::{AuthorityError, Backend};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no backends provided")]
    NoBackends,

    #[error(transparent)]
    Backend(#[from] AuthorityError),

    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("health check interval must be non-zero")]
    ZeroInterval,

    #[error("health check timeout must be non-zero")]
    ZeroProbeTimeout,

    #[error("health check path `{0}` must start with '/'")]
    ProbePath(String),
}

/// Validate `config` and return its backends in configured order.
pub fn validate_config(config: &BalancerConfig) -> Result<Vec<Backend>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut backends = Vec::with_capacity(config.backends.len());

    for raw in &config.backends {
        match Backend::parse(raw) {
            Ok(backend) => backends.push(backend),
            Err(AuthorityError::Empty) => {}
            Err(e) => errors.push(e.into()),
        }
    }
    if backends.is_empty() && errors.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.health_check.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health_check.timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::ProbePath(config.health_check.path.clone()));
    }

    if errors.is_empty() {
        Ok(backends)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let backends = validate_config(&BalancerConfig::default()).unwrap();
        assert_eq!(backends.len(), 2);
        assert_eq!(backends[0].authority(), "localhost:8081");
    }

    #[test]
    fn test_empty_backends_rejected() {
        let mut config = BalancerConfig::default();
        config.backends = vec!["".into(), "  ".into()];
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoBackends]));

        config.backends.clear();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoBackends]));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = BalancerConfig::default();
        config.backends = vec!["ok:1".into(), "missing-port".into()];
        config.listener.port = 0;
        config.health_check.interval_ms = 0;
        config.health_check.path = "health".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::Backend(AuthorityError::MissingPort(_))));
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::ProbePath("health".into())));
    }
}
