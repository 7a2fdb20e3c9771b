//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use chunkner_api::capability::ExecutionMode;
use chunkner_api::{Config, MergePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Window planning
    #[serde(default)]
    pub windowing: WindowingConfig,

    /// Span merging tolerances
    #[serde(default)]
    pub merge: MergeConfig,

    /// Tokenizer and classifier selection
    #[serde(default)]
    pub model: ModelConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Window planning configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WindowingConfig {
    /// Model sequence budget, special tokens included
    pub max_tokens: usize,

    /// Tokens shared by consecutive windows
    pub stride_tokens: usize,

    /// Special tokens the basic tokenizer reserves per window
    pub special_tokens: usize,
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            stride_tokens: 128,
            special_tokens: 2,
        }
    }
}

/// Merge configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Largest gap in characters at which same-label spans still merge
    pub adjacency_tolerance: usize,

    /// Only join continuation pieces that touch
    pub require_touching: bool,

    /// Prefixes marking subword continuation pieces
    pub continuation_markers: Vec<String>,

    /// Characters allowed between two pieces of one mention
    pub gap_chars: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            adjacency_tolerance: 1,
            require_touching: true,
            continuation_markers: vec!["##".to_string()],
            gap_chars: " \t\r\n-\u{2013}\u{2014}".to_string(),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Lexicon file for the dictionary classifier
    pub lexicon: Option<PathBuf>,

    /// External classifier command line
    pub command: Option<String>,

    /// HuggingFace tokenizer.json (needs the `hf-tokenizer` feature)
    pub tokenizer: Option<PathBuf>,
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Include metadata in output
    pub include_metadata: bool,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Strip surrounding whitespace before analysis
    pub trim_input: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            include_metadata: false,
            pretty_json: true,
            trim_input: true,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Classify windows in parallel once `parallel_threshold` is reached
    pub parallel: bool,

    /// Window count from which parallel execution kicks in
    pub parallel_threshold: usize,

    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_threshold: 8,
            worker_threads: 0,
        }
    }
}

impl CliConfig {
    /// Load a configuration file.
    ///
    /// Relative model paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: CliConfig = toml::from_str(&source)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            config.model.resolve_paths(base);
        }
        Ok(config)
    }

    /// Load a configuration file or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Execution mode implied by the performance settings
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.performance.parallel {
            ExecutionMode::Adaptive
        } else {
            ExecutionMode::Sequential
        }
    }

    /// Worker threads, `None` meaning one per CPU
    pub fn worker_threads(&self) -> Option<usize> {
        match self.performance.worker_threads {
            0 => None,
            n => Some(n),
        }
    }

    /// Build the API configuration, validating window and merge settings
    pub fn to_api_config(&self) -> Result<Config> {
        self.api_config(self.execution_mode())
    }

    /// Build the API configuration with an explicit execution mode
    pub fn api_config(&self, mode: ExecutionMode) -> Result<Config> {
        if self.merge.continuation_markers.iter().any(|m| m.is_empty()) {
            return Err(CliError::ConfigError(
                "merge.continuation_markers must not contain empty strings".to_string(),
            )
            .into());
        }
        if self.windowing.special_tokens >= self.windowing.max_tokens {
            return Err(CliError::ConfigError(format!(
                "windowing.special_tokens ({}) leaves no room in max_tokens ({})",
                self.windowing.special_tokens, self.windowing.max_tokens
            ))
            .into());
        }

        let mut policy = MergePolicy {
            adjacency_tolerance: self.merge.adjacency_tolerance,
            require_touching: self.merge.require_touching,
            continuation_markers: self.merge.continuation_markers.clone(),
            ..Default::default()
        };
        policy.gap_chars = self.merge.gap_chars.chars().collect();

        Config::builder()
            .max_tokens(self.windowing.max_tokens)
            .stride_tokens(self.windowing.stride_tokens)
            .merge_policy(policy)
            .execution_mode(mode)
            .parallel_threshold(self.performance.parallel_threshold)
            .threads(self.worker_threads())
            .trim_input(self.output.trim_input)
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }
}

impl ModelConfig {
    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.lexicon, &mut self.tokenizer].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
