//! API error types

use chunkner_engine::EngineError;
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine error
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the caller must change parameters to succeed
    pub fn is_invalid_configuration(&self) -> bool {
        match self {
            ApiError::Config(_) => true,
            ApiError::Engine(err) => err.is_invalid_configuration(),
            _ => false,
        }
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
