//! HuggingFace `tokenizer.json` support

use super::Tokenizer;
use crate::error::InferenceError;
use std::path::Path;

/// Tokenizer loaded from a HuggingFace `tokenizer.json`
///
/// Truncation and padding configured in the file are switched off: the
/// engine windows long documents itself and needs offsets for every token.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    special_tokens: usize,
}

impl HfTokenizer {
    /// Load a tokenizer file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let mut inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            InferenceError::message(format!("failed to load tokenizer from {}: {e}", path.display()))
        })?;

        inner.with_padding(None);
        inner
            .with_truncation(None)
            .map_err(|e| InferenceError::message(format!("failed to disable truncation: {e}")))?;

        // The post-processor adds the same tokens around any single sequence
        let special_tokens = inner
            .encode("", true)
            .map_err(|e| InferenceError::message(format!("failed to probe special tokens: {e}")))?
            .len();

        Ok(Self {
            inner,
            special_tokens,
        })
    }
}

impl Tokenizer for HfTokenizer {
    fn tokenize_with_offsets(&self, text: &str) -> Result<Vec<(usize, usize)>, InferenceError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| InferenceError::message(format!("encoding failed: {e}")))?;
        Ok(encoding.get_offsets().to_vec())
    }

    fn num_special_tokens_overhead(&self) -> usize {
        self.special_tokens
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("special_tokens", &self.special_tokens)
            .finish_non_exhaustive()
    }
}
