//! Scope configuration file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vislink_scope::HistorySettings;

use crate::error::ConfigError;
use crate::validation::validate_config;

/// Settings for the level-history scope and the processor feeding it.
///
/// Stored as TOML; every field is optional and falls back to its default.
///
/// # TOML Format
///
/// ```toml
/// buffer_size = 512
/// samples_per_block = 256
/// max_channels = 8
/// max_block_size = 4096
/// repaint_rate_hz = 20
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    /// Level slots kept per channel.
    pub buffer_size: usize,

    /// Samples reduced into each level slot.
    pub samples_per_block: usize,

    /// Channels the scope reserves storage for.
    pub max_channels: usize,

    /// Largest host block the processor prepares for.
    pub max_block_size: usize,

    /// How often the editor repaints, in Hz.
    pub repaint_rate_hz: u32,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        let history = HistorySettings::default();
        Self {
            buffer_size: history.buffer_size,
            samples_per_block: history.samples_per_block,
            max_channels: history.max_channels,
            max_block_size: 4096,
            repaint_rate_hz: 20,
        }
    }
}

impl ScopeConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "scope config loaded");
        Ok(config)
    }

    /// Load the config at `path`, or the defaults if no file exists there.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no scope config, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ScopeConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.validate()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::info!(path = %path.display(), "scope config saved");
        Ok(())
    }

    /// Convert the config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(validate_config(self)?)
    }

    /// Settings for constructing a [`LevelHistory`](vislink_scope::LevelHistory).
    pub fn history_settings(&self) -> HistorySettings {
        HistorySettings::from(self)
    }
}

impl From<&ScopeConfig> for HistorySettings {
    fn from(config: &ScopeConfig) -> Self {
        Self {
            buffer_size: config.buffer_size,
            samples_per_block: config.samples_per_block,
            max_channels: config.max_channels,
        }
    }
}
