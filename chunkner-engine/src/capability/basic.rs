//! Regex word/punctuation tokenizer

use super::Tokenizer;
use crate::error::InferenceError;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]").expect("token pattern is valid"));

/// Splits text into runs of word characters and single punctuation marks.
///
/// This approximates a model tokenizer closely enough for lexicon and
/// command-line classifiers. Each word counts as one token, so windows are
/// planned in words rather than subword pieces.
#[derive(Debug, Clone)]
pub struct BasicTokenizer {
    special_tokens: usize,
}

impl BasicTokenizer {
    /// Create a tokenizer reporting the BERT-style overhead of two special tokens
    pub fn new() -> Self {
        Self { special_tokens: 2 }
    }

    /// Override the special-token overhead
    pub fn with_special_tokens(mut self, count: usize) -> Self {
        self.special_tokens = count;
        self
    }
}

impl Default for BasicTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for BasicTokenizer {
    fn tokenize_with_offsets(&self, text: &str) -> Result<Vec<(usize, usize)>, InferenceError> {
        Ok(TOKEN_PATTERN
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect())
    }

    fn num_special_tokens_overhead(&self) -> usize {
        self.special_tokens
    }

    fn name(&self) -> &str {
        "basic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_punctuation() {
        let tok = BasicTokenizer::new();
        let text = "Non-small cell, stage IV.";
        let offsets = tok.tokenize_with_offsets(text).unwrap();
        let pieces: Vec<&str> = offsets.iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(pieces, ["Non", "-", "small", "cell", ",", "stage", "IV", "."]);
    }

    #[test]
    fn test_multibyte_offsets_are_bytes() {
        let tok = BasicTokenizer::new();
        let text = "café über";
        let offsets = tok.tokenize_with_offsets(text).unwrap();
        assert_eq!(offsets, vec![(0, 5), (6, 11)]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let tok = BasicTokenizer::new();
        assert!(tok.tokenize_with_offsets("").unwrap().is_empty());
        assert!(tok.tokenize_with_offsets(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_special_token_overhead() {
        assert_eq!(BasicTokenizer::new().num_special_tokens_overhead(), 2);
        assert_eq!(
            BasicTokenizer::new()
                .with_special_tokens(0)
                .num_special_tokens_overhead(),
            0
        );
    }
}
