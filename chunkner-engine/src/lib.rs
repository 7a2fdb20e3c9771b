//! Application orchestration for windowed named-entity recognition
//!
//! This crate runs a bounded-context classifier over documents of any
//! length: it plans token windows, classifies each window, and reconciles the
//! overlapping detections with the algorithms in `chunkner-core`.

#![warn(missing_docs)]

pub mod capability;
pub mod chunker;
pub mod config;
pub mod error;
pub mod executor;
pub mod processor;

// Re-export key types
pub use capability::{
    BasicTokenizer, Classifier, CommandClassifier, FnClassifier, LexiconClassifier, LexiconEntry,
    Tokenizer,
};
#[cfg(feature = "hf-tokenizer")]
pub use capability::HfTokenizer;
pub use chunker::{ChunkManager, ChunkOutcome, TextChunk};
pub use config::EngineConfig;
pub use error::{EngineError, InferenceError, Result};
pub use executor::{ExecutionMode, Executor};
pub use processor::{chunked_ner, ChunkedNer, ChunkedNerBuilder, Output, ProcessingMetadata};

// Re-export from core for convenience
pub use chunkner_core::{EntitySpan, MergePolicy, RawDetection};
