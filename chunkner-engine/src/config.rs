//! Configuration types for the engine

use crate::{
    error::{EngineError, Result},
    ExecutionMode,
};
use chunkner_core::MergePolicy;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Model sequence budget, special tokens included
    pub max_tokens: usize,
    /// Tokens shared by consecutive windows
    pub stride_tokens: usize,
    /// Tolerances for the merge passes
    pub merge_policy: MergePolicy,
    /// Execution mode selector
    pub execution_mode: ExecutionMode,
    /// Number of threads for parallel execution (None = auto)
    pub threads: Option<usize>,
    /// Minimum window count before adaptive mode goes parallel
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            stride_tokens: 128,
            merge_policy: MergePolicy::default(),
            execution_mode: ExecutionMode::Sequential,
            threads: None,
            parallel_threshold: 8,
        }
    }
}

impl EngineConfig {
    /// Create a fast configuration that classifies windows concurrently
    pub fn fast() -> Self {
        Self {
            execution_mode: ExecutionMode::Adaptive,
            parallel_threshold: 2,
            ..Self::default()
        }
    }

    /// Create a balanced configuration
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Create a configuration with wider overlap between windows
    pub fn precise() -> Self {
        Self {
            stride_tokens: 192,
            ..Self::default()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "fast" => Some(Self::fast()),
            "balanced" | "default" => Some(Self::balanced()),
            "precise" => Some(Self::precise()),
            _ => None,
        }
    }

    /// Check the parameters that do not depend on the tokenizer.
    ///
    /// The window size itself is checked once the tokenizer's special-token
    /// overhead is known.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(EngineError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.stride_tokens >= self.max_tokens {
            return Err(EngineError::ConfigError(format!(
                "stride_tokens ({}) must be less than max_tokens ({})",
                self.stride_tokens, self.max_tokens
            )));
        }
        if self.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "thread count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
