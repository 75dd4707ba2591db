//! Configuration loading from disk and the command line.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::cli::Cli;
use crate::config::schema::BalancerConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::load_balancer::Backend;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", ValidationErrors(.0))]
    Validation(Vec<ValidationError>),
}

struct ValidationErrors<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Configuration that passed validation, with its parsed backend list.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: BalancerConfig,
    pub backends: Vec<Backend>,
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Validate an already assembled configuration.
pub fn finalize(config: BalancerConfig) -> Result<LoadedConfig, ConfigError> {
    let backends = validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(LoadedConfig { config, backends })
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    finalize(read_config_file(path)?)
}

/// Build the effective configuration: defaults, then the optional file, then flags.
pub fn load_from_cli(cli: &Cli) -> Result<LoadedConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => BalancerConfig::default(),
    };
    cli.apply(&mut config);
    finalize(config)
}
