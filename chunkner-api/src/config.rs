//! High-level configuration API

use crate::error::{ApiError, Result};
use chunkner_engine::{EngineConfig, ExecutionMode, MergePolicy};

/// High-level configuration for entity extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub(crate) engine: EngineConfig,
    pub(crate) trim_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            trim_input: true,
        }
    }
}

impl Config {
    /// Create a fast configuration
    pub fn fast() -> Self {
        Self {
            engine: EngineConfig::fast(),
            ..Self::default()
        }
    }

    /// Create a balanced configuration
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Create a configuration with wider window overlap
    pub fn precise() -> Self {
        Self {
            engine: EngineConfig::precise(),
            ..Self::default()
        }
    }

    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Model sequence budget
    pub fn max_tokens(&self) -> usize {
        self.engine.max_tokens
    }

    /// Overlap between windows
    pub fn stride_tokens(&self) -> usize {
        self.engine.stride_tokens
    }

    /// Whether surrounding whitespace is stripped before analysis
    pub fn trim_input(&self) -> bool {
        self.trim_input
    }

    /// Thread count for parallel execution
    pub fn threads(&self) -> Option<usize> {
        self.engine.threads
    }

    /// Underlying engine configuration
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the model sequence budget, special tokens included
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.engine.max_tokens = max_tokens;
        self
    }

    /// Set the overlap between consecutive windows
    pub fn stride_tokens(mut self, stride_tokens: usize) -> Self {
        self.config.engine.stride_tokens = stride_tokens;
        self
    }

    /// Set thread count
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.engine.threads = threads;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.engine.execution_mode = mode;
        self
    }

    /// Set the window count at which adaptive mode goes parallel
    pub fn parallel_threshold(mut self, windows: usize) -> Self {
        self.config.engine.parallel_threshold = windows;
        self
    }

    /// Replace the merge tolerances
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.config.engine.merge_policy = policy;
        self
    }

    /// Set the largest gap, in characters, at which same-label spans still merge
    pub fn adjacency_tolerance(mut self, chars: usize) -> Self {
        self.config.engine.merge_policy.adjacency_tolerance = chars;
        self
    }

    /// Require continuation pieces to touch before they are joined
    pub fn require_touching(mut self, yes: bool) -> Self {
        self.config.engine.merge_policy.require_touching = yes;
        self
    }

    /// Strip surrounding whitespace before analysis
    pub fn trim_input(mut self, yes: bool) -> Self {
        self.config.trim_input = yes;
        self
    }

    /// Use fast configuration
    pub fn fast(mut self) -> Self {
        self.config.engine = EngineConfig::fast();
        self
    }

    /// Use precise configuration
    pub fn precise(mut self) -> Self {
        self.config.engine = EngineConfig::precise();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        self.config
            .engine
            .validate()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let config = Config::builder()
            .max_tokens(256)
            .stride_tokens(32)
            .threads(Some(4))
            .trim_input(false)
            .require_touching(false)
            .build()
            .unwrap();

        assert_eq!(config.max_tokens(), 256);
        assert_eq!(config.stride_tokens(), 32);
        assert_eq!(config.threads(), Some(4));
        assert!(!config.trim_input());
        assert!(!config.engine().merge_policy.require_touching);
    }

    #[test]
    fn test_build_rejects_bad_stride() {
        let err = Config::builder()
            .max_tokens(128)
            .stride_tokens(128)
            .build()
            .unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_presets() {
        assert!(Config::default().trim_input());
        assert_eq!(Config::precise().stride_tokens(), 192);
        assert_eq!(Config::fast().engine().execution_mode, ExecutionMode::Adaptive);
        assert_eq!(Config::balanced(), Config::default());
    }
}
