//! ---
//! sicp_section: "01-core-functionality"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "TOML configuration for links, logging and named displays."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use sicp_proto::{Address, MAX_GROUP_ID};
use sicp_transport::{RetryPolicy, DEFAULT_PORT};
use tracing::debug;

use crate::logging::LogFormat;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> Duration {
    RetryPolicy::DEFAULT_TIMEOUT
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_attempts() -> u32 {
    RetryPolicy::DEFAULT_ATTEMPTS
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_monitor_id() -> u8 {
    1
}

/// Primary configuration object for SICP tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub displays: IndexMap<String, DisplayConfig>,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "SICP_CONFIG";

    /// Load configuration from disk, respecting the `SICP_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Read and validate one configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Retrieve a display by its configured name.
    pub fn display(&self, name: &str) -> Option<&DisplayConfig> {
        self.displays.get(name)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.transport.validate()?;
        for (name, display) in &self.displays {
            display.validate(name)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Link parameters shared by every display.
#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-attempt reply deadline, in milliseconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

impl TransportConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, self.timeout)
    }

    fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(anyhow!("transport.attempts must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(anyhow!("transport.timeout must be greater than zero"));
        }
        if self.connect_timeout.is_zero() {
            return Err(anyhow!("transport.connect_timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            attempts: default_attempts(),
        }
    }
}

/// Logging sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Directory for the daily rolling log file. No file is written when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

/// One named display panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    pub host: String,
    /// Overrides `transport.port` for this display.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_monitor_id")]
    pub monitor_id: u8,
    #[serde(default)]
    pub group_id: u8,
    #[serde(default)]
    pub description: Option<String>,
}

impl DisplayConfig {
    pub fn new(host: impl Into<String>, monitor_id: u8) -> Self {
        Self {
            host: host.into(),
            port: None,
            monitor_id,
            group_id: 0,
            description: None,
        }
    }

    pub fn address(&self) -> Address {
        Address::new(self.monitor_id, self.group_id)
    }

    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("display '{name}' must define a host"));
        }
        if self.monitor_id == 0 {
            return Err(anyhow!(
                "display '{name}' monitor_id must be within 1..=255; 0 is broadcast"
            ));
        }
        if self.group_id > MAX_GROUP_ID {
            return Err(anyhow!(
                "display '{name}' group_id {} exceeds {MAX_GROUP_ID}",
                self.group_id
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
[transport]
timeout = 1500
attempts = 2

[logging]
format = "structured-json"

[displays.lobby]
host = "10.0.0.21"
monitor_id = 3
description = "Entrance wall"

[displays.cafeteria]
host = "10.0.0.22"
port = 5001
group_id = 4
"#;

    #[test]
    fn parses_sections_and_keeps_display_order() {
        let config: AppConfig = SAMPLE.parse().unwrap();
        assert_eq!(config.transport.timeout, Duration::from_millis(1500));
        assert_eq!(config.transport.port, 5000);
        assert_eq!(config.transport.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.logging.format, LogFormat::StructuredJson);

        let names: Vec<_> = config.displays.keys().cloned().collect();
        assert_eq!(names, vec!["lobby", "cafeteria"]);

        let lobby = config.display("lobby").unwrap();
        assert_eq!(lobby.address(), Address::new(3, 0));
        assert_eq!(lobby.port_or(config.transport.port), 5000);

        let cafeteria = config.display("cafeteria").unwrap();
        assert_eq!(cafeteria.address(), Address::new(1, 4));
        assert_eq!(cafeteria.port_or(config.transport.port), 5001);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = "".parse().unwrap();
        assert_eq!(config.transport, TransportConfig::default());
        assert_eq!(config.transport.retry_policy(), RetryPolicy::default());
        assert!(config.displays.is_empty());
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        let cases = [
            "[transport]\nattempts = 0",
            "[transport]\ntimeout = 0",
            "[displays.a]\nhost = \"\"",
            "[displays.a]\nhost = \"10.0.0.1\"\nmonitor_id = 0",
            "[displays.a]\nhost = \"10.0.0.1\"\ngroup_id = 255",
        ];
        for case in cases {
            assert!(case.parse::<AppConfig>().is_err(), "accepted: {case}");
        }
    }

    #[test]
    fn loads_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("sicp.toml");
        let mut file = fs::File::create(&present).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let loaded = AppConfig::load_with_source(&[&missing, &present]).unwrap();
        assert_eq!(loaded.source, present);
        assert_eq!(loaded.config.displays.len(), 2);
    }

    #[test]
    fn reports_inspected_paths_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nowhere.toml");
        let err = AppConfig::load(&[&missing]).unwrap_err();
        assert!(err.to_string().contains("nowhere.toml"));
    }
}
