//! Explorer configuration
//!
//! Every section has defaults, so a YAML file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Playback clock configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock period between ticks
    pub tick_interval_ms: u64,
    /// Ticks needed to sweep the whole timeline
    pub steps: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            steps: 200,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Neighborhood expansion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborhoodConfig {
    pub default_depth: usize,
    /// Requested depths are clamped to this
    pub max_depth: usize,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            default_depth: 1,
            max_depth: 3,
        }
    }
}

impl NeighborhoodConfig {
    /// Requested depth, or the default, clamped to `max_depth`
    pub fn resolve_depth(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_depth).min(self.max_depth)
    }
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of stats tables kept
    pub stats_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { stats_capacity: 64 }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub playback: PlaybackConfig,
    pub neighborhood: NeighborhoodConfig,
    pub cache: CacheConfig,
}

impl ExplorerConfig {
    pub fn from_yaml_str(raw: &str) -> ConfigResult<Self> {
        // An empty document is all defaults
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ExplorerConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("playback.tick_interval_ms must be positive".into()));
        }
        if self.playback.steps == 0 {
            return Err(ConfigError::Invalid("playback.steps must be positive".into()));
        }
        if self.cache.stats_capacity == 0 {
            return Err(ConfigError::Invalid("cache.stats_capacity must be positive".into()));
        }
        Ok(())
    }
}
