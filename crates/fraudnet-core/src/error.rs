//! Error types for fraudnet.

use thiserror::Error;

/// Result type alias using `FraudError`.
pub type Result<T> = std::result::Result<T, FraudError>;

/// Errors that can occur at the boundaries of the analysis engine.
///
/// The detection and scoring computations themselves never fail; errors only
/// arise from input validation, configuration and the kernel registry.
#[derive(Debug, Error)]
pub enum FraudError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Kernel not found in registry.
    #[error("Kernel not found: {0}")]
    KernelNotFound(String),

    /// Kernel already registered.
    #[error("Kernel already registered: {0}")]
    KernelAlreadyRegistered(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FraudError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        FraudError::ValidationError(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        FraudError::ConfigError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        FraudError::InternalError(msg.into())
    }

    /// Create a kernel not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        FraudError::KernelNotFound(id.into())
    }

    /// Returns true if the caller can fix the request and retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FraudError::ValidationError(_) | FraudError::ConfigError(_)
        )
    }
}
