//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use chunkner_api::dto::{EntityRecord, Metadata};
use chunkner_api::Output;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs one object per document as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    documents: Vec<DocumentData>,
    include_metadata: bool,
    pretty: bool,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentData {
    /// Where the document came from
    pub source: String,
    /// Entities in character offsets
    pub entities: Vec<EntityRecord>,
    /// Runtime statistics, when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Metadata>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            documents: Vec::new(),
            include_metadata: false,
            pretty: true,
        }
    }

    /// Emit processing metadata for each document
    pub fn with_metadata(mut self, yes: bool) -> Self {
        self.include_metadata = yes;
        self
    }

    /// Pretty print the array
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()> {
        self.documents.push(DocumentData {
            source: source.to_string(),
            entities: output.entities.clone(),
            metadata: self.include_metadata.then(|| output.metadata.clone()),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
