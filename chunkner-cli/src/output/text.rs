//! Plain text output formatter

use super::{single_line, OutputFormatter};
use anyhow::Result;
use chunkner_api::Output;
use std::io::{self, Write};

/// Plain text formatter - one tab-separated entity per line
///
/// Columns are source, start, end, label, score and text. Offsets are in
/// characters.
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()> {
        for entity in &output.entities {
            writeln!(
                self.writer,
                "{source}\t{}\t{}\t{}\t{:.3}\t{}",
                entity.start,
                entity.end,
                entity.label,
                entity.score,
                single_line(&entity.text)
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_output;

    #[test]
    fn test_one_line_per_entity() {
        let mut buffer = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut buffer);
            formatter
                .format_document("note.txt", &sample_output())
                .unwrap();
            formatter.finish().unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "note.txt\t8\t17\tCHEMICAL\t0.960\tcisplatin\n\
             note.txt\t22\t33\tDISEASE\t0.910\tlung cancer\n"
        );
    }
}
