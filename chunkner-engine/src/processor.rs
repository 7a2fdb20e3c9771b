//! Windowed NER processor and builder
//!
//! [`ChunkedNer`] runs the whole pipeline for one document:
//!
//! 1. tokenize once and validate the token offsets;
//! 2. plan overlapping windows that fit the model budget;
//! 3. classify each window's text and rebase detections to the document;
//! 4. reconcile: deduplicate, merge adjacent spans, join continuations.

use crate::{
    capability::{BasicTokenizer, Classifier, Tokenizer},
    chunker::ChunkManager,
    config::EngineConfig,
    error::{EngineError, Result},
    executor::{auto_select, ExecutionMode, Executor, SequentialExecutor},
};
use chunkner_core::{reconcile, EntitySpan, MergePolicy, OffsetMap, WindowPlanner};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// Rich output with metadata
#[derive(Debug, Clone)]
pub struct Output {
    /// Reconciled entities, sorted by start offset
    pub entities: Vec<EntitySpan>,
    /// Processing metadata
    pub metadata: ProcessingMetadata,
}

/// Processing metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingMetadata {
    /// Execution mode that was actually used
    pub execution_mode: ExecutionMode,
    /// Tokens in the document, special tokens excluded
    pub tokens: usize,
    /// Windows planned
    pub windows: usize,
    /// Classifier invocations made
    pub inference_calls: usize,
    /// Detections returned by the classifier across all windows
    pub raw_detections: usize,
    /// Detections dropped as malformed
    pub dropped_detections: usize,
    /// Entities left after reconciliation
    pub entities: usize,
    /// Wall-clock time for the whole document
    pub processing_time: Duration,
}

impl ProcessingMetadata {
    fn empty(execution_mode: ExecutionMode, processing_time: Duration) -> Self {
        Self {
            execution_mode,
            tokens: 0,
            windows: 0,
            inference_calls: 0,
            raw_detections: 0,
            dropped_detections: 0,
            entities: 0,
            processing_time,
        }
    }
}

/// Reusable windowed NER pipeline
///
/// ```
/// use chunkner_engine::{ChunkedNer, FnClassifier, RawDetection};
///
/// let ner = ChunkedNer::builder()
///     .classifier(FnClassifier::new(|chunk: &str| {
///         Ok(chunk
///             .match_indices("aspirin")
///             .map(|(at, w)| RawDetection::new("CHEMICAL", 0.9, at, at + w.len(), w))
///             .collect())
///     }))
///     .max_tokens(8)
///     .stride_tokens(2)
///     .build()
///     .unwrap();
///
/// let entities = ner.extract("He took aspirin for the headache.").unwrap();
/// assert_eq!(entities.len(), 1);
/// assert_eq!(entities[0].text, "aspirin");
/// ```
pub struct ChunkedNer {
    tokenizer: Arc<dyn Tokenizer>,
    classifier: Arc<dyn Classifier>,
    config: EngineConfig,
    chunk_manager: ChunkManager,
    executor: Box<dyn Executor>,
}

impl ChunkedNer {
    /// Start building a processor
    pub fn builder() -> ChunkedNerBuilder {
        ChunkedNerBuilder::new()
    }

    /// Create a processor from explicit parts.
    ///
    /// Fails with an invalid-configuration error when the window left after
    /// the tokenizer's special tokens is empty or not larger than the stride.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        classifier: Arc<dyn Classifier>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let planner = WindowPlanner::for_model(
            config.max_tokens,
            tokenizer.num_special_tokens_overhead(),
            config.stride_tokens,
        )?;
        let executor = select_executor(&config)?;

        log::debug!(
            "chunked NER ready: tokenizer={}, classifier={}, window={} tokens, stride={}",
            tokenizer.name(),
            classifier.name(),
            planner.window_size(),
            planner.stride()
        );

        Ok(Self {
            tokenizer,
            classifier,
            config,
            chunk_manager: ChunkManager::new(planner),
            executor,
        })
    }

    /// Engine configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Window planner in use
    pub fn planner(&self) -> &WindowPlanner {
        self.chunk_manager.planner()
    }

    /// Run the pipeline and return only the entities
    pub fn extract(&self, document: &str) -> Result<Vec<EntitySpan>> {
        Ok(self.process(document)?.entities)
    }

    /// Run the pipeline on one document
    pub fn process(&self, document: &str) -> Result<Output> {
        let started = Instant::now();

        if document.trim().is_empty() {
            log::debug!("document is empty or whitespace; nothing to classify");
            return Ok(Output {
                entities: Vec::new(),
                metadata: ProcessingMetadata::empty(ExecutionMode::Sequential, started.elapsed()),
            });
        }

        let offsets = self
            .tokenizer
            .tokenize_with_offsets(document)
            .map_err(EngineError::Tokenization)?;
        let offsets = OffsetMap::new(document, offsets)?;
        let chunks = self.chunk_manager.chunk_document(&offsets);

        let execution_mode = self.resolve_mode(chunks.len());
        let outcomes = match execution_mode {
            ExecutionMode::Sequential => {
                SequentialExecutor.run(document, &chunks, self.classifier.as_ref())?
            }
            _ => self
                .executor
                .run(document, &chunks, self.classifier.as_ref())?,
        };

        let mut raw_detections = 0;
        let mut inference_calls = 0;
        let mut spans = Vec::new();
        for outcome in outcomes {
            raw_detections += outcome.raw_detections;
            inference_calls += usize::from(outcome.invoked);
            spans.extend(outcome.spans);
        }
        let rebased = spans.len();

        let entities = reconcile(spans, document, &self.config.merge_policy);

        let metadata = ProcessingMetadata {
            execution_mode,
            tokens: offsets.len(),
            windows: chunks.len(),
            inference_calls,
            raw_detections,
            dropped_detections: raw_detections - rebased,
            entities: entities.len(),
            processing_time: started.elapsed(),
        };
        log::info!(
            "{} tokens in {} windows ({}): {} detections -> {} entities in {:.1?}",
            metadata.tokens,
            metadata.windows,
            metadata.execution_mode,
            metadata.raw_detections,
            metadata.entities,
            metadata.processing_time
        );

        Ok(Output { entities, metadata })
    }

    fn resolve_mode(&self, windows: usize) -> ExecutionMode {
        match self.config.execution_mode {
            ExecutionMode::Adaptive => auto_select(windows, self.config.parallel_threshold),
            _ => self.executor.mode(),
        }
    }
}

impl std::fmt::Debug for ChunkedNer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedNer")
            .field("tokenizer", &self.tokenizer.name())
            .field("classifier", &self.classifier.name())
            .field("config", &self.config)
            .finish()
    }
}

fn select_executor(config: &EngineConfig) -> Result<Box<dyn Executor>> {
    match config.execution_mode {
        ExecutionMode::Sequential => Ok(Box::new(SequentialExecutor)),
        #[cfg(feature = "parallel")]
        ExecutionMode::Parallel | ExecutionMode::Adaptive => {
            Ok(Box::new(ParallelExecutor::new(config.threads)?))
        }
        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Parallel | ExecutionMode::Adaptive => {
            log::warn!("built without the `parallel` feature; running sequentially");
            Ok(Box::new(SequentialExecutor))
        }
    }
}

/// Builder for ChunkedNer
///
/// Provides a fluent interface for configuring the processor. The tokenizer
/// defaults to [`BasicTokenizer`]; a classifier is required.
pub struct ChunkedNerBuilder {
    config: EngineConfig,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    classifier: Option<Arc<dyn Classifier>>,
}

impl Default for ChunkedNerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedNerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            tokenizer: None,
            classifier: None,
        }
    }

    /// Replace the whole engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the tokenizer
    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Some(Arc::new(tokenizer));
        self
    }

    /// Set a shared tokenizer
    pub fn shared_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Set the classifier
    pub fn classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// Set a shared classifier
    pub fn shared_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the model sequence budget
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the overlap between windows
    pub fn stride_tokens(mut self, stride_tokens: usize) -> Self {
        self.config.stride_tokens = stride_tokens;
        self
    }

    /// Set the merge tolerances
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.config.merge_policy = policy;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config.threads = count;
        self
    }

    /// Set the window count at which adaptive mode goes parallel
    pub fn parallel_threshold(mut self, windows: usize) -> Self {
        self.config.parallel_threshold = windows;
        self
    }

    /// Build the processor
    pub fn build(self) -> Result<ChunkedNer> {
        let classifier = self
            .classifier
            .ok_or_else(|| EngineError::ConfigError("a classifier is required".to_string()))?;
        let tokenizer = self
            .tokenizer
            .unwrap_or_else(|| Arc::new(BasicTokenizer::new()));
        ChunkedNer::new(tokenizer, classifier, self.config)
    }
}

/// Find entities in a document of any length.
///
/// Windows of at most `max_tokens` tokens (special tokens included) overlap
/// by `stride_tokens`. Configuration is checked before anything else, so a
/// bad configuration fails even for an empty document. An empty or
/// whitespace-only document yields no entities without calling either
/// capability.
pub fn chunked_ner<T, C>(
    document: &str,
    max_tokens: usize,
    stride_tokens: usize,
    tokenizer: &T,
    classifier: &C,
) -> Result<Vec<EntitySpan>>
where
    T: Tokenizer + ?Sized,
    C: Classifier + ?Sized,
{
    let planner = WindowPlanner::for_model(
        max_tokens,
        tokenizer.num_special_tokens_overhead(),
        stride_tokens,
    )?;

    if document.trim().is_empty() {
        return Ok(Vec::new());
    }

    let offsets = tokenizer
        .tokenize_with_offsets(document)
        .map_err(EngineError::Tokenization)?;
    let offsets = OffsetMap::new(document, offsets)?;
    let chunks = ChunkManager::new(planner).chunk_document(&offsets);

    let mut spans = Vec::new();
    for outcome in SequentialExecutor.run(document, &chunks, &classifier)? {
        spans.extend(outcome.spans);
    }

    Ok(reconcile(spans, document, &MergePolicy::default()))
}
