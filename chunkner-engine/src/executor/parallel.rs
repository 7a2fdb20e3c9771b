//! Parallel execution strategy

use crate::{
    capability::Classifier,
    chunker::{run_chunk, ChunkOutcome, TextChunk},
    error::{EngineError, Result},
    executor::{ExecutionMode, Executor},
};
use rayon::prelude::*;

/// Parallel multi-threaded executor
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: Option<rayon::ThreadPool>,
}

impl ParallelExecutor {
    /// Create a new parallel executor.
    ///
    /// `threads = None` uses rayon's global pool.
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let pool = match threads {
            Some(0) => {
                return Err(EngineError::ConfigError(
                    "thread count must be greater than 0".to_string(),
                ))
            }
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| EngineError::ParallelError(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { pool })
    }

    /// Number of worker threads that will run the windows
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |pool| pool.current_num_threads())
    }
}

impl Executor for ParallelExecutor {
    fn run(
        &self,
        document: &str,
        chunks: &[TextChunk],
        classifier: &dyn Classifier,
    ) -> Result<Vec<ChunkOutcome>> {
        // Indexed collect keeps outcomes in window order
        let classify_all = || {
            chunks
                .par_iter()
                .map(|chunk| run_chunk(document, chunk, classifier))
                .collect::<Result<Vec<_>>>()
        };

        match &self.pool {
            Some(pool) => pool.install(classify_all),
            None => classify_all(),
        }
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}
