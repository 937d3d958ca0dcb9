//! Core error types for breathwork-core.
//!
//! The timer itself never fails: its inputs are validated at the
//! configuration boundary or clamped. Everything that can go wrong lives
//! here, at the edges.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for breathwork-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decoding errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML encoding errors
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Named preset does not exist
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Home directory could not be determined
    #[error("Could not determine a home directory for the data dir")]
    NoHomeDir,
}

/// Validation errors raised while building a session configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A phase duration is missing, zero, negative or not finite
    #[error("Invalid duration for '{field}': {value} (must be a positive number of seconds)")]
    NonPositiveDuration { field: String, value: f64 },

    /// A duration string could not be parsed
    #[error("Cannot parse '{input}' as {expected}")]
    Unparsable { input: String, expected: &'static str },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
