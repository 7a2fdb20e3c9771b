//! Window planning and span reconciliation for windowed NER
//!
//! A token-classification model can only look at a bounded number of tokens
//! at once. This crate holds the pure, I/O-free half of running such a model
//! over long documents:
//!
//! - [`WindowPlanner`]: overlapping token windows covering a document
//! - [`OffsetMap`]: token index to text offset lookups
//! - [`RawDetection`] / [`EntitySpan`]: chunk-local and document-anchored spans
//! - [`deduplicate`], [`merge_adjacent`], [`merge_continuations`]: the
//!   reconciliation passes, composed by [`reconcile`]
//!
//! Offsets are UTF-8 byte offsets that always sit on `char` boundaries, so
//! `&document[span.start..span.end]` is valid for every span produced here.
//!
//! # Example
//!
//! ```rust
//! use chunkner_core::{reconcile, EntitySpan, MergePolicy};
//!
//! let doc = "Patients with lung cancer took aspirin.";
//! let spans = vec![
//!     EntitySpan::from_document(doc, "DISEASE", 14, 18, 0.90, "lung").unwrap(),
//!     EntitySpan::from_document(doc, "DISEASE", 19, 25, 0.80, "cancer").unwrap(),
//!     EntitySpan::from_document(doc, "CHEMICAL", 31, 38, 0.91, "aspirin").unwrap(),
//!     EntitySpan::from_document(doc, "CHEMICAL", 31, 38, 0.95, "aspirin").unwrap(),
//! ];
//!
//! let entities = reconcile(spans, doc, &MergePolicy::default());
//! assert_eq!(entities.len(), 2);
//! assert_eq!(entities[0].text, "lung cancer");
//! assert_eq!(entities[1].score, 0.95);
//! ```

#![warn(missing_docs)]

pub mod dedup;
pub mod error;
pub mod merge;
pub mod offsets;
pub mod span;
pub mod window;

pub use dedup::{deduplicate, SpanKey};
pub use error::{CoreError, Result};
pub use merge::{merge_adjacent, merge_continuations, MergePolicy, DEFAULT_GAP_CHARS};
pub use offsets::OffsetMap;
pub use span::{sort_spans, EntitySpan, RawDetection};
pub use window::{plan_windows, TokenWindow, WindowPlanner, Windows};

/// Run the three reconciliation passes in order.
///
/// Deduplication by `(start, end, label)`, then adjacency merging, then
/// continuation merging. The result is sorted by `start` and every span's
/// text is the exact document slice.
pub fn reconcile(spans: Vec<EntitySpan>, document: &str, policy: &MergePolicy) -> Vec<EntitySpan> {
    let unique = deduplicate(spans);
    let adjacent = merge_adjacent(unique, document, policy);
    merge_continuations(adjacent, document, policy)
}
