//! Tokenizer and classifier capabilities
//!
//! The engine never owns a model. It talks to two pluggable capabilities:
//!
//! - a [`Tokenizer`] that reports the byte offsets of every token in a text
//!   and how many special tokens the model adds per sequence;
//! - a [`Classifier`] that labels one chunk of text and returns detections
//!   with chunk-relative byte offsets.
//!
//! Both must be shareable across threads so windows can be classified in
//! parallel.

mod basic;
mod command;
#[cfg(feature = "hf-tokenizer")]
mod hf;
mod lexicon;

pub use basic::BasicTokenizer;
pub use command::CommandClassifier;
#[cfg(feature = "hf-tokenizer")]
pub use hf::HfTokenizer;
pub use lexicon::{LexiconClassifier, LexiconEntry};

use crate::error::InferenceError;
use chunkner_core::RawDetection;
use std::sync::Arc;

/// Splits text into model tokens
pub trait Tokenizer: Send + Sync {
    /// Byte offsets `(start, end)` of each token, in order, without special tokens
    fn tokenize_with_offsets(&self, text: &str) -> Result<Vec<(usize, usize)>, InferenceError>;

    /// Number of special tokens the model adds to a single sequence
    fn num_special_tokens_overhead(&self) -> usize;

    /// Human-readable name used in logs
    fn name(&self) -> &str {
        "tokenizer"
    }
}

/// Labels entities in one chunk of text
pub trait Classifier: Send + Sync {
    /// Detect entities in `chunk`; offsets are byte offsets into `chunk`
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError>;

    /// Human-readable name used in logs
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize_with_offsets(&self, text: &str) -> Result<Vec<(usize, usize)>, InferenceError> {
        (**self).tokenize_with_offsets(text)
    }

    fn num_special_tokens_overhead(&self) -> usize {
        (**self).num_special_tokens_overhead()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize_with_offsets(&self, text: &str) -> Result<Vec<(usize, usize)>, InferenceError> {
        (**self).tokenize_with_offsets(text)
    }

    fn num_special_tokens_overhead(&self) -> usize {
        (**self).num_special_tokens_overhead()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Arc<T> {
    fn tokenize_with_offsets(&self, text: &str) -> Result<Vec<(usize, usize)>, InferenceError> {
        (**self).tokenize_with_offsets(text)
    }

    fn num_special_tokens_overhead(&self) -> usize {
        (**self).num_special_tokens_overhead()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Classifier + ?Sized> Classifier for &T {
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError> {
        (**self).classify(chunk)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Classifier + ?Sized> Classifier for Box<T> {
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError> {
        (**self).classify(chunk)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError> {
        (**self).classify(chunk)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Classifier backed by a closure
///
/// Handy for tests and for wrapping an in-process model.
///
/// ```
/// use chunkner_engine::{Classifier, FnClassifier, RawDetection};
///
/// let classifier = FnClassifier::new(|chunk: &str| {
///     Ok(chunk
///         .match_indices("aspirin")
///         .map(|(at, word)| RawDetection::new("CHEMICAL", 0.9, at, at + word.len(), word))
///         .collect())
/// });
/// let found = classifier.classify("take aspirin").unwrap();
/// assert_eq!(found[0].start, Some(5));
/// ```
pub struct FnClassifier<F> {
    f: F,
    name: String,
}

impl<F> FnClassifier<F>
where
    F: Fn(&str) -> Result<Vec<RawDetection>, InferenceError> + Send + Sync,
{
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self {
            f,
            name: "fn".to_string(),
        }
    }

    /// Set the name reported in logs
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&str) -> Result<Vec<RawDetection>, InferenceError> + Send + Sync,
{
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError> {
        (self.f)(chunk)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnClassifier<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClassifier").field("name", &self.name).finish()
    }
}
