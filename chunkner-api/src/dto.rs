//! Data Transfer Objects for API

use crate::error::Result;
use crate::offsets::CharOffsets;
use chunkner_engine::EntitySpan;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Input source for processing
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    /// Raw text string
    Text(String),
    /// File path
    File(PathBuf),
    /// Raw bytes, decoded as UTF-8
    Bytes(Vec<u8>),
    /// Reader (not serializable)
    #[cfg_attr(feature = "serde", serde(skip))]
    Reader(Box<dyn Read>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<dyn Read>").finish(),
        }
    }
}

impl Input {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Create input from file path
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Read the text content from the input.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn read_text(self) -> Result<String> {
        match self {
            Input::Text(text) => Ok(text),
            Input::File(path) => Ok(decode_lossy(fs::read(&path)?)),
            Input::Bytes(bytes) => Ok(decode_lossy(bytes)),
            Input::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer)?;
                Ok(decode_lossy(buffer))
            }
        }
    }
}

fn decode_lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        log::warn!(
            "input is not valid UTF-8 (first error at byte {}); replacing invalid sequences",
            err.utf8_error().valid_up_to()
        );
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    })
}

/// One recognised entity, in character offsets
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    /// Entity type
    #[cfg_attr(feature = "serde", serde(alias = "entity"))]
    pub label: String,
    /// Confidence in `[0, 1]`
    pub score: f32,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// The entity's text, exactly as it appears in the input
    pub text: String,
}

impl EntityRecord {
    /// Convert an engine span using the text's offset table
    pub fn from_span(span: EntitySpan, offsets: &CharOffsets) -> Self {
        Self {
            start: offsets.byte_to_char(span.start),
            end: offsets.byte_to_char(span.end),
            label: span.label,
            score: span.score,
            text: span.text,
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// Processing metadata with runtime statistics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Total bytes analysed
    pub total_bytes: usize,
    /// Total characters analysed
    pub total_chars: usize,
    /// Tokens produced by the tokenizer
    pub total_tokens: usize,
    /// Windows planned
    pub windows: usize,
    /// Classifier invocations
    pub inference_calls: usize,
    /// Detections returned before reconciliation
    pub raw_detections: usize,
    /// Detections dropped as malformed
    pub dropped_detections: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Execution mode used
    pub mode_used: String,
}

/// Complete output with entities and metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Output {
    /// The analysed text; entity offsets index into it
    pub text: String,
    /// Entities sorted by start offset
    pub entities: Vec<EntityRecord>,
    /// Processing metadata
    pub metadata: Metadata,
}

impl Output {
    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entities were found
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities with the given label
    pub fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a EntityRecord> {
        self.entities.iter().filter(move |e| e.label == label)
    }

    /// Serialize to pretty JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossy_bytes() {
        let text = Input::from_bytes(b"caf\xC3\xA9 \xFF ok".to_vec())
            .read_text()
            .unwrap();
        assert_eq!(text, "café \u{FFFD} ok");
    }

    #[test]
    fn test_reader_input() {
        let text = Input::from_reader(std::io::Cursor::new(b"aspirin".to_vec()))
            .read_text()
            .unwrap();
        assert_eq!(text, "aspirin");
    }

    #[test]
    fn test_record_from_span_uses_char_offsets() {
        let doc = "Über aspirin";
        let span = EntitySpan::from_document(doc, "CHEMICAL", 6, 13, 0.9, "aspirin").unwrap();
        let record = EntityRecord::from_span(span, &CharOffsets::new(doc));
        assert_eq!((record.start, record.end), (5, 12));
        assert_eq!(record.char_len(), 7);
        assert_eq!(record.text, "aspirin");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_entity_alias_on_input() {
        let record: EntityRecord = serde_json::from_str(
            r#"{"entity": "GENE", "score": 0.5, "start": 0, "end": 4, "text": "EGFR"}"#,
        )
        .unwrap();
        assert_eq!(record.label, "GENE");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""label":"GENE""#));
    }
}
