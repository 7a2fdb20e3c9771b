//! Byte to character offset conversion
//!
//! The engine works in UTF-8 byte offsets. Callers outside Rust usually index
//! text by character, so every offset leaving this crate is converted once
//! here.

/// Converts byte offsets of one text into character offsets
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// Byte offset of each character; empty for ASCII text
    starts: Vec<usize>,
    len: usize,
    ascii: bool,
}

impl CharOffsets {
    /// Index `text`
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                starts: Vec::new(),
                len: text.len(),
                ascii: true,
            };
        }
        Self {
            starts: text.char_indices().map(|(i, _)| i).collect(),
            len: text.len(),
            ascii: false,
        }
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        if self.ascii {
            self.len
        } else {
            self.starts.len()
        }
    }

    /// Character index of a byte offset.
    ///
    /// An offset inside a multi-byte character maps to that character.
    /// Offsets at or past the end map to the character count.
    pub fn byte_to_char(&self, byte: usize) -> usize {
        if byte >= self.len {
            return self.char_len();
        }
        if self.ascii {
            return byte;
        }
        match self.starts.binary_search(&byte) {
            Ok(index) => index,
            Err(index) => index - 1,
        }
    }
}
