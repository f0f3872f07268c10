//! Unified error handling for the workout-intervals library.
//!
//! Only input decoding, input validation, configuration and report encoding
//! can fail. The analysis stages themselves are total: numeric edge cases
//! degrade to undefined values or "N/A" strings instead of errors.

use thiserror::Error;

/// Unified error type for workout-intervals operations.
#[derive(Debug, Error)]
pub enum IntervalError {
    /// The fix table could not be decoded at all
    #[error("Invalid track input: {message}")]
    InvalidInput { message: String },

    /// A decoded fix carries a value outside its valid range
    #[error("Fix {index} is invalid: {message}")]
    InvalidFix { index: usize, message: String },

    /// A defined timestamp is earlier than the previous defined timestamp
    #[error("Fix {index} has a timestamp earlier than the fix before it")]
    NonMonotonicTime { index: usize },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Report could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntervalError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        IntervalError::ConfigError {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_fix(index: usize, message: impl Into<String>) -> Self {
        IntervalError::InvalidFix {
            index,
            message: message.into(),
        }
    }

    /// True when the error comes from the caller's input rather than from
    /// configuration or encoding.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IntervalError::InvalidInput { .. }
                | IntervalError::InvalidFix { .. }
                | IntervalError::NonMonotonicTime { .. }
        )
    }
}

/// Result type alias for workout-intervals operations.
pub type Result<T> = std::result::Result<T, IntervalError>;
