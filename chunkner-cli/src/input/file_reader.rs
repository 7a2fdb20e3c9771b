//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File reader tolerant of invalid UTF-8
pub struct FileReader;

impl FileReader {
    /// Read a file as text, replacing invalid UTF-8 sequences with U+FFFD
    pub fn read_text(path: &Path) -> Result<String> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(err) => {
                log::warn!(
                    "{}: invalid UTF-8 at byte {}, replacing undecodable sequences",
                    path.display(),
                    err.utf8_error().valid_up_to()
                );
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        }
    }

    /// Get file size in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        Ok(metadata.len())
    }
}
