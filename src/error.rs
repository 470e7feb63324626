//! Error types for optiviz.
//!
//! Errors only exist at the edges of the crate: loading configuration,
//! loading a trace file, parsing command-line arguments and writing output.
//! Normalization, layout, animation and scene building are total and
//! degrade to placeholder scenes instead of failing.

use thiserror::Error;

/// Result type alias for optiviz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Unified error type for all fallible optiviz operations.
#[derive(Debug, Error)]
pub enum VizError {
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

    // ===== Trace Errors =====
    /// Trace file is not valid JSON or does not have the response shape.
    #[error("Trace parse error: {0}")]
    TraceParse(#[from] serde_json::Error),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== CLI Errors =====
    /// Bad command-line usage.
    #[error("Usage error: {0}")]
    Usage(String),
}

impl VizError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a usage error.
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Whether the error came from the user's invocation rather than data.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
