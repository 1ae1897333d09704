//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value once all layers are
    /// merged (spec's startup validation: `min_chars <= max_chars`,
    /// `theta_low < theta_high`).
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
