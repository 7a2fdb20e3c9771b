//! Entity span types
//!
//! [`RawDetection`] is what a classifier returns for one chunk: offsets are
//! relative to that chunk and may be missing. [`EntitySpan`] is anchored to
//! the full document and always carries the exact document slice as text.

use std::ops::Range;

/// Unprocessed classifier output for one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Entity type assigned by the classifier
    pub label: String,
    /// Confidence in `[0, 1]`
    pub score: f32,
    /// Chunk-relative start offset, if the classifier reported one
    pub start: Option<usize>,
    /// Chunk-relative end offset, if the classifier reported one
    pub end: Option<usize>,
    /// Piece text as the classifier saw it (may carry a `##` marker)
    pub word: String,
}

impl RawDetection {
    /// Create a detection with both offsets present
    pub fn new(
        label: impl Into<String>,
        score: f32,
        start: usize,
        end: usize,
        word: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            score,
            start: Some(start),
            end: Some(end),
            word: word.into(),
        }
    }

    /// Create a detection that carries no offsets
    pub fn unanchored(label: impl Into<String>, score: f32, word: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            score,
            start: None,
            end: None,
            word: word.into(),
        }
    }

    /// Move this detection into document coordinates.
    ///
    /// `base` is the offset at which the chunk starts inside `document`.
    /// Returns `None` for malformed detections: a missing offset, an empty
    /// label, an empty or inverted range, or a range that does not slice
    /// `document` on `char` boundaries.
    pub fn rebase(&self, document: &str, base: usize) -> Option<EntitySpan> {
        let start = base.checked_add(self.start?)?;
        let end = base.checked_add(self.end?)?;
        EntitySpan::from_document(document, &self.label, start, end, self.score, &self.word)
    }
}

/// A labeled span anchored to document offsets
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    /// Entity type
    pub label: String,
    /// Confidence in `[0, 1]`; the maximum of all merged pieces
    pub score: f32,
    /// Start offset in the document (inclusive)
    pub start: usize,
    /// End offset in the document (exclusive)
    pub end: usize,
    /// Exactly `document[start..end]`
    pub text: String,
    /// Raw classifier piece text, used to recognise continuation pieces.
    /// Empty once continuation merging has run.
    pub token_text: String,
}

impl EntitySpan {
    /// Build a span over `document[start..end]`.
    ///
    /// Returns `None` if the label is empty, `start >= end`, or the range is
    /// out of bounds or splits a character.
    pub fn from_document(
        document: &str,
        label: &str,
        start: usize,
        end: usize,
        score: f32,
        token_text: &str,
    ) -> Option<Self> {
        if label.is_empty() || start >= end {
            return None;
        }
        let text = document.get(start..end)?;
        Some(Self {
            label: label.to_string(),
            score,
            start,
            end,
            text: text.to_string(),
            token_text: token_text.to_string(),
        })
    }

    /// Offset range of this span
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans are never empty once constructed; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether two spans share at least one offset
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Grow this span to cover `other` and refresh the surface text.
    ///
    /// End and score take the maxima; `token_text` is left to the caller.
    pub(crate) fn absorb(&mut self, other: &EntitySpan, document: &str) {
        self.end = self.end.max(other.end);
        self.score = self.score.max(other.score);
        self.reslice(document);
    }

    /// Recompute `text` from the document.
    pub(crate) fn reslice(&mut self, document: &str) {
        // Merged ranges join two valid slices, so boundaries stay valid.
        if let Some(text) = document.get(self.start..self.end) {
            self.text = text.to_string();
        }
    }
}

/// Sort spans by `(start, end)`, keeping the relative order of ties
pub fn sort_spans(spans: &mut [EntitySpan]) {
    spans.sort_by_key(|span| (span.start, span.end));
}
