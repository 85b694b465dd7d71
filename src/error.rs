//! Error types for mcpi.
//!
//! Every fallible operation returns `Result<T, EstimatorError>` instead of
//! panicking. The estimator itself has a single domain error (a target below
//! one sample); the rest cover loading and validating configuration.

use thiserror::Error;

/// Result type alias for mcpi operations.
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Unified error type for all mcpi operations.
#[derive(Debug, Error)]
pub enum EstimatorError {
    // ===== Estimator =====
    /// A run was requested with fewer than one target sample.
    #[error("Invalid target: samples target must be at least 1, got {target}")]
    InvalidTarget {
        /// The rejected target.
        target: u64,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EstimatorError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check if this error came from user input rather than the environment.
    ///
    /// Hosts use this to decide between disabling an action and reporting a
    /// failure.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidTarget { .. } | Self::Config { .. } | Self::Validation(_)
        )
    }
}

impl From<serde_json::Error> for EstimatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
