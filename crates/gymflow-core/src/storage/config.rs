//! TOML-based application configuration.
//!
//! The only externally configurable inputs are the webhook relay base URL
//! and the engine tick interval; everything else falls back to hardcoded
//! defaults via serde. Stored at `~/.config/gymflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::data_dir;
use crate::engine::EngineConfig;
use crate::error::{ConfigError, Result};

/// Engine timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Seconds between ticks. 30 is a demo value; run 300-900 in
    /// production.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

/// Webhook relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelaySection {
    /// Base URL of the external workflow endpoint. Relay is disabled
    /// when unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/gymflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub relay: RelaySection,
}

fn default_tick_interval_secs() -> u64 {
    30
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&raw)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(config)
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Engine timing derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tick_interval: Duration::from_secs(self.engine.tick_interval_secs.max(1)),
            ..EngineConfig::default()
        }
    }
}
