//! Error types for the simulation core.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for session construction.
///
/// No error is produced once a match is running; per-tick
/// inconsistencies are logic defects guarded by debug assertions.
#[derive(Debug, Error)]
pub enum GameError {
    /// A tunable or match-setup value was out of range.
    #[error("Invalid configuration: {field}: {message}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Arena generation could not satisfy its guarantees within the
    /// retry budget. Callers may retry with a fresh seed.
    #[error("Arena generation failed: {0}")]
    GenerationFailed(String),
}

impl GameError {
    /// Shorthand for an [`GameError::InvalidConfig`] with a formatted message.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
