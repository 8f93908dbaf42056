//! Range checks for [`ScopeConfig`](crate::ScopeConfig) values.

use thiserror::Error;
use vislink_scope::MAX_CHANNELS;

/// Lowest accepted repaint rate in Hz.
pub const MIN_REPAINT_RATE_HZ: u32 = 1;

/// Highest accepted repaint rate in Hz.
pub const MAX_REPAINT_RATE_HZ: u32 = 120;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A size field was zero.
    #[error("'{field}' must be greater than zero")]
    Zero {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field exceeded or fell below its allowed range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks every field of `config`, collecting all failures.
pub fn validate_config(config: &crate::ScopeConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("buffer_size", config.buffer_size),
        ("samples_per_block", config.samples_per_block),
        ("max_block_size", config.max_block_size),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if !(1..=MAX_CHANNELS).contains(&config.max_channels) {
        errors.push(ValidationError::OutOfRange {
            field: "max_channels",
            value: config.max_channels,
            min: 1,
            max: MAX_CHANNELS,
        });
    }

    if !(MIN_REPAINT_RATE_HZ..=MAX_REPAINT_RATE_HZ).contains(&config.repaint_rate_hz) {
        errors.push(ValidationError::OutOfRange {
            field: "repaint_rate_hz",
            value: config.repaint_rate_hz as usize,
            min: MIN_REPAINT_RATE_HZ as usize,
            max: MAX_REPAINT_RATE_HZ as usize,
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
