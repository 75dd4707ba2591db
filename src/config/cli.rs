//! Command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::schema::{BalancerConfig, ForwardMode, Policy};

#[derive(Debug, Parser)]
#[command(name = "edge-balancer")]
#[command(about = "HTTP load balancer with active health checks", long_about = None)]
pub struct Cli {
    /// TOML configuration file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Comma-separated list of backend authorities.
    #[arg(short, long)]
    pub backends: Option<String>,

    /// Health check interval (e.g. 10s, 500ms, 1m).
    #[arg(short, long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Per-probe timeout (e.g. 2s).
    #[arg(long, value_parser = parse_duration)]
    pub probe_timeout: Option<Duration>,

    /// Backend selection policy.
    #[arg(long, value_enum)]
    pub policy: Option<Policy>,

    /// How inbound requests are forwarded.
    #[arg(long, value_enum)]
    pub forward_mode: Option<ForwardMode>,

    /// Deadline for each forwarded request; 0s disables it.
    #[arg(long, value_parser = parse_duration)]
    pub forward_timeout: Option<Duration>,

    /// Address for the Prometheus exporter.
    #[arg(long)]
    pub metrics_address: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut BalancerConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(backends) = &self.backends {
            config.backends = backends
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(interval) = self.interval {
            config.health_check.interval_ms = millis(interval);
        }
        if let Some(timeout) = self.probe_timeout {
            config.health_check.timeout_ms = millis(timeout);
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(mode) = self.forward_mode {
            config.forward.mode = mode;
        }
        if let Some(timeout) = self.forward_timeout {
            config.forward.timeout_ms = millis(timeout);
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = Some(addr.clone());
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Parse a duration such as `10s`, `1500ms`, `2m` or `1h`.
///
/// A bare number is read as seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration `{raw}`"))?;

    let duration = match unit {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(3600)),
        other => return Err(format!("unknown duration unit `{other}` in `{raw}`")),
    };
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("7"), Ok(Duration::from_secs(7)));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("ten").is_err());
        assert!(parse_duration("5d").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "edge-balancer",
            "--port",
            "9090",
            "--backends",
            "a:1, b:2",
            "--interval",
            "3s",
            "--policy",
            "random",
            "--forward-mode",
            "pass-through",
        ]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.listener.port, 9090);
        assert_eq!(config.backends, vec!["a:1", "b:2"]);
        assert_eq!(config.health_check.interval(), Duration::from_secs(3));
        assert_eq!(config.policy, Policy::Random);
        assert_eq!(config.forward.mode, ForwardMode::PassThrough);
    }

    #[test]
    fn test_sub_second_durations_survive() {
        let cli = Cli::parse_from([
            "edge-balancer",
            "--interval",
            "500ms",
            "--probe-timeout",
            "250ms",
            "--forward-timeout",
            "500ms",
        ]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.health_check.interval(), Duration::from_millis(500));
        assert_eq!(config.health_check.timeout(), Duration::from_millis(250));
        assert_eq!(config.forward.timeout(), Some(Duration::from_millis(500)));
        assert!(crate::config::loader::finalize(config).is_ok());
    }

    #[test]
    fn test_zero_forward_timeout_disables_deadline() {
        let cli = Cli::parse_from(["edge-balancer", "--forward-timeout", "0s"]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.forward.timeout(), None);
    }

    #[test]
    fn test_huge_duration_saturates() {
        let cli = Cli::parse_from(["edge-balancer", "--probe-timeout", "99999999999999999h"]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.health_check.timeout_ms, u64::MAX);
    }

    #[test]
    fn test_backends_flag_keeps_order_and_skips_blanks() {
        let cli = Cli::parse_from(["edge-balancer", "--backends", "b:2, a:1,,c:3,"]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.backends, vec!["b:2", "a:1", "c:3"]);
    }

    #[test]
    fn test_empty_backends_flag_clears_list() {
        let cli = Cli::parse_from(["edge-balancer", "--backends", ""]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::parse_from(["edge-balancer"]);
        let mut config = BalancerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.backends.len(), 2);
    }
}
