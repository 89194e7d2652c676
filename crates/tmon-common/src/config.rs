//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Shared primitives and utilities for the monitor runtime."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_metrics_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9899))
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(5_000)
}

fn default_alert_interval() -> Duration {
    Duration::from_millis(15_000)
}

fn default_clock_interval() -> Duration {
    Duration::from_millis(1_000)
}

fn default_alert_probability() -> f64 {
    0.3
}

fn default_alert_capacity() -> usize {
    5
}

/// Upper bound on `alerts.capacity`; the feed is a short newest-first list.
pub const MAX_ALERT_CAPACITY: usize = 1_000;

fn default_alert_messages() -> Vec<String> {
    [
        "Temperature spike detected",
        "Vibration anomaly reported",
        "Fuel pressure variance",
        "Oil temperature warning",
        "Performance degradation noted",
    ]
    .iter()
    .map(|message| (*message).to_owned())
    .collect()
}

/// Primary configuration object for the monitor runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and built-in defaults are in effect.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "TMON_CONFIG";

    /// Load configuration from disk, respecting the `TMON_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// An explicit `TMON_CONFIG` path must exist. Candidate paths are tried in order
    /// and skipped when missing; if none exist the defaults are returned.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!(
            inspected = %candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "no configuration file found; using defaults"
        );
        Ok(LoadedAppConfig {
            config: Self::default(),
            source: None,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.alerts.validate()?;
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_listen")]
    pub listen: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: default_metrics_listen(),
        }
    }
}

/// Timing and randomness of the simulation loop.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; entropy is used when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default = "default_tick_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub tick_interval: Duration,
    #[serde(default = "default_alert_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub alert_interval: Duration,
    #[serde(default = "default_clock_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub clock_interval: Duration,
    #[serde(default = "default_alert_probability")]
    pub alert_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            tick_interval: default_tick_interval(),
            alert_interval: default_alert_interval(),
            clock_interval: default_clock_interval(),
            alert_probability: default_alert_probability(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, interval) in [
            ("tick_interval", self.tick_interval),
            ("alert_interval", self.alert_interval),
            ("clock_interval", self.clock_interval),
        ] {
            if interval.is_zero() {
                return Err(anyhow!("simulation.{} must be greater than zero", name));
            }
        }
        if !(0.0..=1.0).contains(&self.alert_probability) {
            return Err(anyhow!(
                "simulation.alert_probability must lie within [0, 1], got {}",
                self.alert_probability
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alert_capacity")]
    pub capacity: usize,
    #[serde(default = "default_alert_messages")]
    pub messages: Vec<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            capacity: default_alert_capacity(),
            messages: default_alert_messages(),
        }
    }
}

impl AlertsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_ALERT_CAPACITY).contains(&self.capacity) {
            return Err(anyhow!(
                "alerts.capacity must lie within [1, {}], got {}",
                MAX_ALERT_CAPACITY,
                self.capacity
            ));
        }
        if self.messages.is_empty() {
            return Err(anyhow!("alerts.messages must contain at least one message"));
        }
        Ok(())
    }
}
