//! Execution strategies for window inference
//!
//! Windows are independent once planned, so they can be classified one after
//! another or fanned out over a thread pool. Either way the outcomes come back
//! in window order.

use crate::{
    capability::Classifier,
    chunker::{ChunkOutcome, TextChunk},
    error::Result,
};

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

// Re-export executors
#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One window at a time on the calling thread
    #[default]
    Sequential,
    /// Windows classified concurrently on a thread pool
    Parallel,
    /// Parallel once the window count reaches a threshold
    Adaptive,
}

impl ExecutionMode {
    /// Lowercase name used in logs and output
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Adaptive => "adaptive",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Classify every chunk and return one outcome per chunk, in chunk order.
    ///
    /// The first inference failure aborts the run.
    fn run(
        &self,
        document: &str,
        chunks: &[TextChunk],
        classifier: &dyn Classifier,
    ) -> Result<Vec<ChunkOutcome>>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Automatically select execution mode based on window count
pub fn auto_select(window_count: usize, threshold: usize) -> ExecutionMode {
    if window_count < 2 || window_count < threshold {
        // A single window gains nothing from a thread pool
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}
