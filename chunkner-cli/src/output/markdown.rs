//! Markdown output formatter

use super::{single_line, OutputFormatter};
use anyhow::Result;
use chunkner_api::Output;
use std::io::Write;

/// Markdown formatter - one table per document
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    entity_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entity_count: 0,
        }
    }
}

fn escape_cell(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()> {
        writeln!(self.writer, "## {source}")?;
        writeln!(self.writer)?;

        if output.is_empty() {
            writeln!(self.writer, "_No entities found._")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(self.writer, "| # | Label | Start | End | Score | Text |")?;
        writeln!(self.writer, "|---|-------|-------|-----|-------|------|")?;
        for (i, entity) in output.entities.iter().enumerate() {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {:.3} | {} |",
                i + 1,
                escape_cell(&entity.label),
                entity.start,
                entity.end,
                entity.score,
                escape_cell(&entity.text)
            )?;
        }
        writeln!(self.writer)?;

        self.entity_count += output.len();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total entities: {}*", self.entity_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
