//! Errors raised while loading or checking Larder settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or environment variable could not be merged or decoded.
    #[error("failed to load settings: {0}")]
    Figment(#[from] figment::Error),

    /// A section needed by the requested command has no credentials.
    #[error("settings section '{section}' is missing required values")]
    NotConfigured { section: String },

    #[error("'{field}' has an unusable value: {reason}")]
    InvalidValue { field: String, reason: String },
}
