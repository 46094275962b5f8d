//! Core error types for lockin-core.
//!
//! Every failure the library can surface is a variant of [`CoreError`].
//! None of them are fatal: callers show the message and keep a usable
//! (possibly empty) state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lockin-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No signed-in user, or the identity token could not be obtained.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport-level failure talking to the API
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A deadline timestamp could not be parsed
    #[error("Invalid timestamp: '{input}'")]
    InvalidTimestamp { input: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local goal cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    /// OS keyring errors
    #[error("Credential store error: {0}")]
    Credential(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field is blank
    #[error("'{0}' must not be empty")]
    Empty(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Deadline time not in HH:mm or HH:mm:ss form
    #[error("Invalid deadline time '{0}': expected HH:mm or HH:mm:ss")]
    DeadlineTime(String),
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<keyring::Error> for CoreError {
    fn from(err: keyring::Error) -> Self {
        CoreError::Credential(err.to_string())
    }
}

impl CoreError {
    /// Whether the failure came from the API or transport rather than local input.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CoreError::Api { .. } | CoreError::Network(_) | CoreError::MalformedResponse(_)
        )
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
