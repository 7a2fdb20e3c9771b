//! Layered error types
//!
//! [`InferenceError`] is what a tokenizer or classifier capability reports.
//! [`EngineError`] wraps it together with core and configuration failures.

use chunkner_core::CoreError;
use thiserror::Error;

/// Errors raised by an external capability (tokenizer or classifier)
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Free-form failure reported by the capability
    #[error("{0}")]
    Message(String),

    /// I/O failure while talking to the capability
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The capability answered with something that could not be parsed
    #[error("malformed capability output: {0}")]
    Malformed(String),

    /// An external classifier process exited unsuccessfully
    #[error("classifier command exited with {status}: {stderr}")]
    CommandFailed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },
}

impl InferenceError {
    /// Create a free-form error
    pub fn message(msg: impl Into<String>) -> Self {
        InferenceError::Message(msg.into())
    }
}

/// Engine-level errors (Application Layer)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core algorithm error (invalid window configuration or offsets)
    #[error("core algorithm error: {0}")]
    Core(#[from] CoreError),

    /// The tokenizer failed on the document
    #[error("tokenization failed: {0}")]
    Tokenization(#[source] InferenceError),

    /// The classifier failed on one window; the whole document fails
    #[error("inference failed for window {window}: {source}")]
    Inference {
        /// Index of the failing window
        window: usize,
        /// Underlying capability error
        source: InferenceError,
    },

    /// Parallel execution error
    #[cfg(feature = "parallel")]
    #[error("parallel execution failed: {0}")]
    ParallelError(String),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl EngineError {
    /// Whether this error means the caller must change parameters
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::Core(CoreError::InvalidConfiguration { .. }) | EngineError::ConfigError(_)
        )
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
