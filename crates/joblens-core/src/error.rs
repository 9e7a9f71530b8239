//! Core error types for the Joblens workspace.
//!
//! Upstream failures (bad statuses, timeouts, markup drift) are not errors in
//! this workspace; they degrade to absent pages or absent fields. The types
//! here cover configuration and caller input.

use thiserror::Error;

/// Central error type for all Joblens operations.
#[derive(Error, Debug)]
pub enum JoblensError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (invalid search input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `JoblensError`.
pub type Result<T> = std::result::Result<T, JoblensError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
