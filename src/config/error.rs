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

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid log format '{0}' (expected 'text' or 'json')")]
    InvalidLogFormat(String),

    #[error("Listing limits must satisfy 1 <= default_limit <= max_limit")]
    InvalidLimits,

    #[error("Refresh interval must be at least one second")]
    InvalidRefreshInterval,

    #[error("Exchange rate must be a positive finite number")]
    InvalidExchangeRate,

    #[error("Collaborator timeout must be between 1 and 30000 ms")]
    InvalidCollaboratorTimeout,
}
