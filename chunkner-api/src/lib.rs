//! Public API for chunkner windowed named-entity recognition
//!
//! This crate provides a stable interface over the engine: plain inputs in,
//! serializable entities with character offsets out.
//!
//! ```
//! use chunkner_api::{Input, NerProcessor};
//! use chunkner_api::capability::LexiconClassifier;
//!
//! let lexicon = LexiconClassifier::from_toml_str(
//!     "[[entity]]\nlabel = \"CHEMICAL\"\nterms = [\"aspirin\"]\n",
//! ).unwrap();
//! let processor = NerProcessor::new(lexicon).unwrap();
//!
//! let output = processor.process(Input::from_text("  Took aspirin.  ")).unwrap();
//! assert_eq!(output.text, "Took aspirin.");
//! assert_eq!((output.entities[0].start, output.entities[0].end), (5, 12));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;
pub mod offsets;

use chunkner_engine::{BasicTokenizer, ChunkedNer, Classifier, Tokenizer};
use dto::{EntityRecord, Metadata};
use error::Result;
use offsets::CharOffsets;
use std::sync::Arc;

// Re-export key types
pub use config::{Config, ConfigBuilder};
pub use dto::{Input, Output};
pub use error::ApiError;
pub use chunkner_engine::MergePolicy;

/// Tokenizers, classifiers and execution modes
pub mod capability {
    #[cfg(feature = "hf-tokenizer")]
    pub use chunkner_engine::HfTokenizer;
    pub use chunkner_engine::{
        BasicTokenizer, Classifier, CommandClassifier, ExecutionMode, FnClassifier,
        InferenceError, LexiconClassifier, LexiconEntry, RawDetection, Tokenizer,
    };
}

/// Main entry point for entity extraction
///
/// Owns a configured engine pipeline and converts its byte-offset spans into
/// character-offset [`EntityRecord`]s.
pub struct NerProcessor {
    inner: Arc<ChunkedNer>,
    config: Config,
}

impl NerProcessor {
    /// Create a processor with the default configuration and [`BasicTokenizer`]
    pub fn new(classifier: impl Classifier + 'static) -> Result<Self> {
        Self::with_config(Config::default(), BasicTokenizer::new(), classifier)
    }

    /// Create a processor with custom configuration and capabilities
    pub fn with_config(
        config: Config,
        tokenizer: impl Tokenizer + 'static,
        classifier: impl Classifier + 'static,
    ) -> Result<Self> {
        Self::with_shared(config, Arc::new(tokenizer), Arc::new(classifier))
    }

    /// Create a processor from shared capabilities
    pub fn with_shared(
        config: Config,
        tokenizer: Arc<dyn Tokenizer>,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self> {
        let inner = ChunkedNer::new(tokenizer, classifier, config.engine.clone())?;
        Ok(Self {
            inner: Arc::new(inner),
            config,
        })
    }

    /// Process input and return entities
    pub fn process(&self, input: Input) -> Result<Output> {
        let mut text = input.read_text()?;
        if self.config.trim_input {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                text = trimmed.to_string();
            }
        }

        let output = self.inner.process(&text)?;
        let offsets = CharOffsets::new(&text);

        let entities = output
            .entities
            .into_iter()
            .map(|span| EntityRecord::from_span(span, &offsets))
            .collect();

        let meta = output.metadata;
        let metadata = Metadata {
            total_bytes: text.len(),
            total_chars: offsets.char_len(),
            total_tokens: meta.tokens,
            windows: meta.windows,
            inference_calls: meta.inference_calls,
            raw_detections: meta.raw_detections,
            dropped_detections: meta.dropped_detections,
            processing_time_ms: meta.processing_time.as_millis() as u64,
            mode_used: meta.execution_mode.to_string(),
        };

        Ok(Output {
            text,
            entities,
            metadata,
        })
    }

    /// Process text directly (convenience method)
    pub fn process_text(&self, text: &str) -> Result<Output> {
        self.process(Input::from_text(text))
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// Convenience functions

/// Process text with the default configuration
pub fn process_text(text: &str, classifier: impl Classifier + 'static) -> Result<Output> {
    NerProcessor::new(classifier)?.process(Input::from_text(text))
}

/// Process a file with the default configuration
pub fn process_file<P: AsRef<std::path::Path>>(
    path: P,
    classifier: impl Classifier + 'static,
) -> Result<Output> {
    NerProcessor::new(classifier)?.process(Input::from_file(path.as_ref().to_path_buf()))
}
