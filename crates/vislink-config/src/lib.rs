//! Configuration for the vislink scope.
//!
//! [`ScopeConfig`] is the on-disk TOML form of the scope and processor
//! settings. Values are validated on load and before save, and the user's
//! config lives in a platform-specific directory (see [`paths`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use vislink_config::{ScopeConfig, default_config_path};
//! use vislink_scope::LevelHistory;
//!
//! let config = ScopeConfig::load_or_default(default_config_path()).unwrap();
//! let scope = LevelHistory::new(config.history_settings());
//! assert_eq!(scope.buffer_size(), config.buffer_size);
//! ```

mod error;
mod scope;

/// Platform-specific configuration paths.
pub mod paths;

/// Range checks for configuration values.
pub mod validation;

pub use error::ConfigError;
pub use paths::{CONFIG_FILE_NAME, default_config_path, ensure_user_config_dir, user_config_dir};
pub use scope::ScopeConfig;
pub use validation::{
    MAX_REPAINT_RATE_HZ, MIN_REPAINT_RATE_HZ, ValidationError, ValidationResult, validate_config,
};
