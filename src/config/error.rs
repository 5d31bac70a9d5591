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
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Idle window must be non-zero")]
    InvalidIdleWindow,

    #[error("Lock budget must allow at least one attempt")]
    InvalidLockBudget,

    #[error("Responder base URL must be http(s)")]
    InvalidBaseUrl,

    #[error("Callback URL must be http(s)")]
    InvalidCallbackUrl,
}
