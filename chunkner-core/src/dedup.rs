//! Duplicate collapse for overlapping windows
//!
//! An entity that lies entirely inside the overlap of two windows is detected
//! twice, possibly with different confidence because the surrounding context
//! differs. Only the more confident reading survives.

use crate::span::EntitySpan;
use std::collections::btree_map::{BTreeMap, Entry};

/// Identity of a detection: identical keys are the same entity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanKey {
    /// Start offset
    pub start: usize,
    /// End offset
    pub end: usize,
    /// Entity type
    pub label: String,
}

impl From<&EntitySpan> for SpanKey {
    fn from(span: &EntitySpan) -> Self {
        Self {
            start: span.start,
            end: span.end,
            label: span.label.clone(),
        }
    }
}

/// Keep the highest-scoring span for every `(start, end, label)`.
///
/// Ties keep the span seen first. The output is ordered by key.
pub fn deduplicate(spans: impl IntoIterator<Item = EntitySpan>) -> Vec<EntitySpan> {
    let mut best: BTreeMap<SpanKey, EntitySpan> = BTreeMap::new();

    for span in spans {
        match best.entry(SpanKey::from(&span)) {
            Entry::Vacant(slot) => {
                slot.insert(span);
            }
            Entry::Occupied(mut slot) => {
                if span.score > slot.get().score {
                    slot.insert(span);
                }
            }
        }
    }

    best.into_values().collect()
}
