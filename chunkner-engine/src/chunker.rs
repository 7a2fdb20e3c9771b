//! Window chunking and per-chunk inference

use crate::{
    capability::Classifier,
    error::{EngineError, Result},
};
use chunkner_core::{EntitySpan, OffsetMap, TokenWindow, WindowPlanner};

/// One window of the document, resolved to a byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of this window in the plan
    pub index: usize,
    /// Token range covered
    pub window: TokenWindow,
    /// Byte offset of the chunk in the document
    pub start: usize,
    /// Byte offset one past the chunk's last character
    pub end: usize,
}

impl TextChunk {
    /// The chunk's text inside `document`
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        document.get(self.start..self.end).unwrap_or_default()
    }

    /// Byte length
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Turns token offsets into overlapping text chunks
#[derive(Debug, Clone)]
pub struct ChunkManager {
    planner: WindowPlanner,
}

impl ChunkManager {
    /// Create a new chunk manager
    pub fn new(planner: WindowPlanner) -> Self {
        Self { planner }
    }

    /// Window planner in use
    pub fn planner(&self) -> &WindowPlanner {
        &self.planner
    }

    /// Plan windows over `offsets` and resolve each to a text range
    pub fn chunk_document(&self, offsets: &OffsetMap) -> Vec<TextChunk> {
        self.planner
            .windows(offsets.len())
            .enumerate()
            .filter_map(|(index, window)| {
                let range = offsets.window_range(window)?;
                Some(TextChunk {
                    index,
                    window,
                    start: range.start,
                    end: range.end,
                })
            })
            .collect()
    }
}

/// What one chunk contributed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkOutcome {
    /// Detections rebased to document offsets
    pub spans: Vec<EntitySpan>,
    /// Detections the classifier returned
    pub raw_detections: usize,
    /// Whether the classifier was called
    pub invoked: bool,
}

impl ChunkOutcome {
    /// Detections discarded as malformed
    pub fn dropped(&self) -> usize {
        self.raw_detections - self.spans.len()
    }
}

/// Classify one chunk and rebase its detections into document coordinates.
///
/// Empty chunks are not sent to the classifier. Detections without offsets,
/// with an empty label, or with a range that does not slice the document are
/// dropped and logged at debug level.
pub fn run_chunk(
    document: &str,
    chunk: &TextChunk,
    classifier: &dyn Classifier,
) -> Result<ChunkOutcome> {
    let text = chunk.text(document);
    if text.is_empty() {
        log::debug!("window {} covers no text; skipping", chunk.index);
        return Ok(ChunkOutcome::default());
    }

    let detections = classifier
        .classify(text)
        .map_err(|source| EngineError::Inference {
            window: chunk.index,
            source,
        })?;

    let mut spans = Vec::with_capacity(detections.len());
    for detection in &detections {
        // Offsets past the chunk would otherwise land in the next window's text
        let inside = detection.end.map_or(true, |end| end <= text.len());
        match detection.rebase(document, chunk.start).filter(|_| inside) {
            Some(span) => spans.push(span),
            None => log::debug!(
                "window {}: dropping detection {:?} ({}) at {:?}..{:?}",
                chunk.index,
                detection.word,
                detection.label,
                detection.start,
                detection.end
            ),
        }
    }

    Ok(ChunkOutcome {
        spans,
        raw_detections: detections.len(),
        invoked: true,
    })
}
