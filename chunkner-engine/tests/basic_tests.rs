//! Basic tests for chunkner-engine

use chunkner_engine::*;

#[test]
fn test_engine_config_creation() {
    let config = EngineConfig::default();
    assert_eq!(config.max_tokens, 512);
    assert_eq!(config.stride_tokens, 128);
    assert_eq!(config.parallel_threshold, 8);

    let fast = EngineConfig::fast();
    assert_eq!(fast.execution_mode, ExecutionMode::Adaptive);

    let precise = EngineConfig::precise();
    assert_eq!(precise.stride_tokens, 192);
    assert_eq!(precise.execution_mode, ExecutionMode::Sequential);
}

#[test]
fn test_execution_mode_selection() {
    use chunkner_engine::executor::auto_select;

    assert_eq!(auto_select(1, 8), ExecutionMode::Sequential);
    assert_eq!(auto_select(7, 8), ExecutionMode::Sequential);

    #[cfg(feature = "parallel")]
    assert_eq!(auto_select(8, 8), ExecutionMode::Parallel);
}

#[test]
fn test_sequential_executor() {
    use chunkner_core::{OffsetMap, WindowPlanner};
    use chunkner_engine::executor::SequentialExecutor;

    let text = "aspirin and ibuprofen and aspirin";
    let offsets = BasicTokenizer::new().tokenize_with_offsets(text).unwrap();
    let offsets = OffsetMap::new(text, offsets).unwrap();
    let chunks = ChunkManager::new(WindowPlanner::new(3, 1).unwrap()).chunk_document(&offsets);
    assert_eq!(chunks.len(), 2);

    let lexicon = LexiconClassifier::new(vec![LexiconEntry {
        label: "CHEMICAL".into(),
        score: 0.8,
        terms: vec!["aspirin".into(), "ibuprofen".into()],
    }])
    .unwrap();

    let outcomes = SequentialExecutor.run(text, &chunks, &lexicon).unwrap();
    assert_eq!(outcomes.len(), 2);
    // "aspirin and ibuprofen" then "ibuprofen and aspirin"
    assert_eq!(outcomes[0].spans.len(), 2);
    assert_eq!(outcomes[1].spans[0].range(), 12..21);
    assert_eq!(outcomes[1].spans[1].range(), 26..33);
}

#[test]
fn test_chunked_ner_builder() {
    let ner = ChunkedNerBuilder::new()
        .classifier(FnClassifier::new(|_: &str| Ok(Vec::new())))
        .max_tokens(64)
        .stride_tokens(16)
        .threads(Some(2))
        .execution_mode(ExecutionMode::Parallel)
        .build()
        .unwrap();

    assert_eq!(ner.planner().window_size(), 62);
    assert_eq!(ner.planner().stride(), 16);
    assert_eq!(ner.config().threads, Some(2));
}

#[test]
fn test_builder_requires_classifier() {
    let err = ChunkedNer::builder().build().unwrap_err();
    assert!(err.is_invalid_configuration());
}

#[test]
fn test_error_handling() {
    let err = ChunkedNer::builder()
        .classifier(FnClassifier::new(|_: &str| Ok(Vec::new())))
        .max_tokens(2)
        .stride_tokens(0)
        .build()
        .unwrap_err();

    // Two special tokens leave no room for text
    assert!(matches!(err, EngineError::Core(_)));
    assert!(err.to_string().contains("too small for special tokens=2"));
}
