//! Token to text offset mapping
//!
//! Tokenizers report, per token, the `(start, end)` offsets it covers in the
//! input text. Given that table, a token window maps back to one contiguous
//! text slice: from the first token's start to the last token's end.

use crate::error::{CoreError, Result};
use crate::window::TokenWindow;
use std::ops::Range;

/// Validated per-token offsets into one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMap {
    offsets: Vec<(usize, usize)>,
}

impl OffsetMap {
    /// Index the tokenizer's offsets for `document`.
    ///
    /// Every pair must satisfy `start <= end <= document.len()` and both ends
    /// must fall on `char` boundaries. Empty pairs are accepted.
    pub fn new(document: &str, offsets: Vec<(usize, usize)>) -> Result<Self> {
        for (token, &(start, end)) in offsets.iter().enumerate() {
            let reason = if start > end {
                Some("start after end")
            } else if end > document.len() {
                Some("past end of document")
            } else if !document.is_char_boundary(start) || !document.is_char_boundary(end) {
                Some("not on a char boundary")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(CoreError::InvalidOffsets {
                    token,
                    start,
                    end,
                    reason,
                });
            }
        }

        Ok(Self { offsets })
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets for one token
    pub fn get(&self, token: usize) -> Option<(usize, usize)> {
        self.offsets.get(token).copied()
    }

    /// Text range covered by a token window.
    ///
    /// Returns `None` for an empty window or one that extends past the last
    /// token. A window whose last token ends before its first token starts
    /// yields an empty range at the first token's start.
    pub fn window_range(&self, window: TokenWindow) -> Option<Range<usize>> {
        if window.is_empty() {
            return None;
        }
        let (start, _) = self.get(window.start)?;
        let (_, end) = self.get(window.end - 1)?;
        Some(start..end.max(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_range() {
        let doc = "The café costs 50";
        // The | café | costs | 50
        let map = OffsetMap::new(doc, vec![(0, 3), (4, 9), (10, 15), (16, 18)]).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.window_range(TokenWindow::new(0, 2)), Some(0..9));
        assert_eq!(&doc[map.window_range(TokenWindow::new(1, 3)).unwrap()], "café costs");
        assert_eq!(map.window_range(TokenWindow::new(3, 4)), Some(16..18));
        assert_eq!(map.window_range(TokenWindow::new(2, 2)), None);
        assert_eq!(map.window_range(TokenWindow::new(3, 5)), None);
    }

    #[test]
    fn test_rejects_bad_offsets() {
        let doc = "café";
        assert!(matches!(
            OffsetMap::new(doc, vec![(0, 3), (3, 4)]),
            Err(CoreError::InvalidOffsets { token: 1, .. })
        ));
        assert!(matches!(
            OffsetMap::new(doc, vec![(2, 1)]),
            Err(CoreError::InvalidOffsets { token: 0, reason: "start after end", .. })
        ));
        assert!(matches!(
            OffsetMap::new(doc, vec![(0, 6)]),
            Err(CoreError::InvalidOffsets { reason: "past end of document", .. })
        ));
    }

    #[test]
    fn test_accepts_degenerate_offsets() {
        let doc = "a b";
        let map = OffsetMap::new(doc, vec![(0, 1), (1, 1), (2, 3)]).unwrap();
        assert_eq!(map.window_range(TokenWindow::new(0, 3)), Some(0..3));
        assert_eq!(map.window_range(TokenWindow::new(1, 2)), Some(1..1));
    }

    #[test]
    fn test_empty_map() {
        let map = OffsetMap::new("", Vec::new()).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.get(0), None);
    }
}
