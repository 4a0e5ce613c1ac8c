//! Domain Errors
//!
//! Error types for relay operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Client input was missing a field or malformed
    #[error("{0}")]
    Validation(String),

    /// A server-held secret is absent
    #[error("{0} is not configured")]
    Configuration(String),

    /// Upstream transport failure or non-success status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The assistant thread could not be created
    #[error("Assistant failed to start")]
    FailedToStart,
}

impl DomainError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    pub fn missing_secret<T: AsRef<str>>(key: T) -> Self {
        Self::Configuration(key.as_ref().to_string())
    }

    pub fn upstream<T: std::fmt::Display>(err: T) -> Self {
        Self::Upstream(err.to_string())
    }
}
