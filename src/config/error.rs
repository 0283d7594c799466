//! Errors raised while reading and checking configuration.

use thiserror::Error;

/// Failure to produce an [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationError),
}

/// A loaded value that breaks a configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    Missing(&'static str),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request timeout must be between 1 and 300 seconds")]
    TimeoutOutOfRange,

    #[error("Minimum credential length must be below the strong length")]
    InvalidThresholds,

    #[error("Invalid origin pattern: {0}")]
    InvalidOriginPattern(String),

    #[error("Settle delays must be greater than zero")]
    InvalidSettleDelay,

    #[error("Navigation settle delay must be longer than the initial one")]
    NavigationSettleTooShort,
}
