use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::facility::{default_targets, Facility};
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub providers: ProviderConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reports: ReportConfig,

    #[serde(default)]
    pub verify: VerifyConfig,

    /// Facilities for `batch`. Falls back to the built-in list when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Facility>>,
}

impl Config {
    pub fn targets(&self) -> Vec<Facility> {
        self.targets.clone().unwrap_or_else(default_targets)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Seed for the mock providers. Random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:5000".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory receiving report files
    #[serde(default = "default_report_dir")]
    pub dir: String,

    #[serde(default = "default_true")]
    pub json: bool,

    #[serde(default = "default_true")]
    pub csv: bool,

    #[serde(default = "default_demo_base_url")]
    pub demo_base_url: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
            json: true,
            csv: true,
            demo_base_url: default_demo_base_url(),
        }
    }
}

fn default_report_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_demo_base_url() -> String {
    "https://app.freightroll.com/demo".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Per-request timeout, humantime format ("10s", "500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Total attempts before giving up on a connection error
    #[serde(default = "default_attempts")]
    pub attempts: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            attempts: default_attempts(),
        }
    }
}

impl VerifyConfig {
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| anyhow::anyhow!("verify.timeout: invalid duration '{}' - {}", self.timeout, e))
    }
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_attempts() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.addr, "127.0.0.1:5000");
        assert!(config.reports.json && config.reports.csv);
        assert_eq!(config.targets().len(), 10);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
scoring:
  weights: { alpha: 0.4, beta: 0.4, gamma: 0.2 }
  benchmarks: { max_trailer_benchmark: 250, max_gate_benchmark: 4 }
providers:
  seed: 42
server:
  addr: "0.0.0.0:8080"
reports:
  dir: "out"
  csv: false
verify:
  timeout: "2s"
  attempts: 5
targets:
  - { name: "Depot A", lat: 35.0, lon: -79.0, tier: SMB }
  - { name: "Depot B", lat: 34.5, lon: -79.5 }
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.scoring.weights.alpha, 0.4);
        assert_eq!(config.scoring.benchmarks.max_gate_benchmark, 4.0);
        assert_eq!(config.providers.seed, Some(42));
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.reports.dir, "out");
        assert!(config.reports.json);
        assert!(!config.reports.csv);
        assert_eq!(config.verify.timeout().unwrap(), Duration::from_secs(2));
        assert_eq!(config.verify.attempts, 5);

        let targets = config.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].segment.as_deref(), Some("SMB"));
        assert!(targets[1].segment.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        let verify = VerifyConfig {
            timeout: "soon".to_string(),
            attempts: 1,
        };
        let err = verify.timeout().unwrap_err();
        assert!(err.to_string().contains("verify.timeout"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(serde_saphyr::from_str::<Config>("queries: []").is_err());
    }
}
