//! Server configuration.
//!
//! Loaded from an optional YAML file named by `RYE_CONFIG`; every field has
//! a default, so an empty document (or no file at all) is valid. `LISTEN`
//! overrides the listen address.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::http::connection::ConnectionSettings;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8080".
    pub listen_addr: String,

    /// Advisory only: reported at startup, never enforced.
    pub max_connections: usize,

    pub read_timeout_ms: u64,

    pub write_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            read_timeout: self.read_timeout(),
            write_timeout: self.write_timeout(),
        }
    }
}

impl LoggingConfig {
    /// The configured level, falling back to INFO on an unknown name.
    pub fn max_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("RYE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        Self::from_yaml_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(contents)?)
    }
}
