//! Classifier backed by an external process
//!
//! The process receives the chunk text on stdin and prints a JSON array of
//! token-classification records on stdout, the shape emitted by aggregated
//! HuggingFace pipelines:
//!
//! ```json
//! [{"entity_group": "DISEASE", "score": 0.93, "word": "lung cancer", "start": 14, "end": 25}]
//! ```
//!
//! `entity` is accepted when `entity_group` is absent. `start`/`end` are
//! character offsets into the chunk and may be `null`.

use super::Classifier;
use crate::error::InferenceError;
use chunkner_core::RawDetection;
use serde::Deserialize;
use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, Deserialize)]
struct PipelineRecord {
    #[serde(default)]
    entity_group: Option<String>,
    #[serde(default)]
    entity: Option<String>,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

/// Runs a command once per chunk
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandClassifier {
    /// Create a classifier that runs `program` with no arguments
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Parse a shell-like command line split on whitespace
    pub fn from_command_line(line: &str) -> Result<Self, InferenceError> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| InferenceError::message("classifier command is empty"))?;
        Ok(Self::new(program).args(parts))
    }

    fn run(&self, chunk: &str) -> Result<Vec<u8>, InferenceError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| InferenceError::message("classifier stdin unavailable"))?;

        // Feed stdin from another thread so a chatty child cannot block on a full stdout pipe
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(chunk.as_bytes()));
            let output = child.wait_with_output();
            match writer.join() {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => output,
            }
        })?;

        if !output.status.success() {
            return Err(InferenceError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl Classifier for CommandClassifier {
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError> {
        let stdout = self.run(chunk)?;
        let records: Vec<PipelineRecord> = serde_json::from_slice(&stdout)
            .map_err(|e| InferenceError::Malformed(format!("classifier output: {e}")))?;

        let char_to_byte = char_boundaries(chunk);
        let to_byte = |offset: Option<usize>| offset.and_then(|c| char_to_byte.get(c).copied());

        Ok(records
            .into_iter()
            .map(|record| RawDetection {
                label: record.entity_group.or(record.entity).unwrap_or_default(),
                score: record.score.unwrap_or(0.0),
                start: to_byte(record.start),
                end: to_byte(record.end),
                word: record.word.unwrap_or_default(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Byte offset of every char index, plus one entry for the end of the text
fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn script(body: &str) -> CommandClassifier {
        CommandClassifier::new("sh").arg("-c").arg(body)
    }

    #[test]
    fn test_char_offsets_become_byte_offsets() {
        let classifier = script(
            r#"cat >/dev/null; echo '[{"entity_group":"CHEMICAL","score":0.9,"word":"aspirin","start":5,"end":12}]'"#,
        );
        let found = classifier.classify("café aspirin").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "CHEMICAL");
        assert_eq!((found[0].start, found[0].end), (Some(6), Some(13)));
        assert_eq!(found[0].word, "aspirin");
    }

    #[test]
    fn test_entity_fallback_and_null_offsets() {
        let classifier = script(
            r#"cat >/dev/null; echo '[{"entity":"B-GENE","score":0.5,"word":"EGFR","start":null,"end":null}]'"#,
        );
        let found = classifier.classify("EGFR").unwrap();
        assert_eq!(found[0].label, "B-GENE");
        assert_eq!(found[0].start, None);
        assert_eq!(found[0].end, None);
    }

    #[test]
    fn test_offset_past_chunk_is_dropped() {
        let classifier = script(
            r#"cat >/dev/null; echo '[{"entity_group":"GENE","score":0.5,"word":"x","start":0,"end":99}]'"#,
        );
        let found = classifier.classify("abc").unwrap();
        assert_eq!(found[0].end, None);
    }

    #[test]
    fn test_reads_chunk_from_stdin() {
        let classifier = script(
            r#"read line; n=${#line}; echo "[{\"entity_group\":\"ALL\",\"score\":1.0,\"word\":\"$line\",\"start\":0,\"end\":$n}]""#,
        );
        let found = classifier.classify("hello").unwrap();
        assert_eq!(found[0].word, "hello");
        assert_eq!(found[0].end, Some(5));
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let err = script("cat >/dev/null; echo boom >&2; exit 3")
            .classify("text")
            .unwrap_err();
        match err {
            InferenceError::CommandFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_output() {
        let err = script("cat >/dev/null; echo not-json").classify("text").unwrap_err();
        assert!(matches!(err, InferenceError::Malformed(_)));
    }

    #[test]
    fn test_missing_program() {
        let err = CommandClassifier::new("/nonexistent/chunkner-model")
            .classify("text")
            .unwrap_err();
        assert!(matches!(err, InferenceError::Io(_)));
    }

    #[test]
    fn test_from_command_line() {
        assert!(CommandClassifier::from_command_line("   ").is_err());
        let classifier = CommandClassifier::from_command_line("python3 ner.py --json").unwrap();
        assert_eq!(classifier.program, "python3");
        assert_eq!(classifier.args, ["ner.py", "--json"]);
    }
}
