//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("Conflict retries must be between 1 and {max}, got {got}")]
    InvalidConflictRetries { got: u32, max: u32 },

    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),

    #[error("Actor '{actor}' is assigned unknown role '{role}'")]
    UnknownRole { actor: String, role: String },

    #[error("Bearer token for actor '{0}' is too short for production")]
    WeakToken(String),

    #[error("Bearer token maps to an empty actor id")]
    EmptyTokenActor,
}
