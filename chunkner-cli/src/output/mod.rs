//! Output formatting module

use anyhow::Result;
use chunkner_api::Output;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output the entities found in one document
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Entity text on a single line
pub(crate) fn single_line(text: &str) -> String {
    text.replace(['\r', '\n', '\t'], " ")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("lung\ncancer"), "lung cancer");
        assert_eq!(single_line("a\r\n\tb"), "a   b");
    }
}
