//! Sequential execution strategy

use crate::{
    capability::Classifier,
    chunker::{run_chunk, ChunkOutcome, TextChunk},
    error::Result,
    executor::{ExecutionMode, Executor},
};

/// Sequential single-threaded executor
#[derive(Debug, Clone, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn run(
        &self,
        document: &str,
        chunks: &[TextChunk],
        classifier: &dyn Classifier,
    ) -> Result<Vec<ChunkOutcome>> {
        chunks
            .iter()
            .map(|chunk| run_chunk(document, chunk, classifier))
            .collect()
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}
