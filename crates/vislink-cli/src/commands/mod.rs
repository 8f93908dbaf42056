//! CLI command implementations.

pub mod config;
pub mod stress;

use std::path::{Path, PathBuf};

use vislink_config::{ScopeConfig, default_config_path};

/// Loads the config at `path`, or the user's default config.
///
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<(ScopeConfig, PathBuf)> {
    match path {
        Some(path) => Ok((ScopeConfig::load(path)?, path.to_path_buf())),
        None => {
            let path = default_config_path();
            Ok((ScopeConfig::load_or_default(&path)?, path))
        }
    }
}
