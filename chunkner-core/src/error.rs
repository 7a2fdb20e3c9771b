//! Core error types

use thiserror::Error;

/// Errors raised by the pure windowing layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Window size, stride or token budget cannot produce a valid plan
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of the violated constraint
        reason: String,
    },

    /// A tokenizer offset pair does not address the document
    #[error("invalid offsets ({start}, {end}) for token {token}: {reason}")]
    InvalidOffsets {
        /// Token index
        token: usize,
        /// Start offset reported by the tokenizer
        start: usize,
        /// End offset reported by the tokenizer
        end: usize,
        /// Which check failed
        reason: &'static str,
    },
}

impl CoreError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        CoreError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
