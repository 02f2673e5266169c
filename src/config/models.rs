// src/config/models.rs
use crate::health::{Catalog, DescriptionKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Description overrides keyed by translation id, e.g. `container_down`.
    #[serde(default)]
    pub descriptions: HashMap<DescriptionKey, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Service snapshot file, YAML or JSON.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("source.path must not be empty")]
    EmptySourcePath,

    #[error("refresh.interval_secs must be greater than zero")]
    ZeroRefreshInterval,

    #[error("metrics.path must start with '/': {0}")]
    InvalidMetricsPath(String),

    #[error("server.bind is not a socket address: {0}")]
    InvalidBind(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptySourcePath);
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidMetricsPath(self.metrics.path.clone()));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidBind(self.server.bind.clone()));
        }
        Ok(())
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::with_overrides(self.descriptions.clone())
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}
