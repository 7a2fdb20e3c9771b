//! Adjacency and continuation merging
//!
//! Both passes are folds over spans sorted by `(start, end)`: each span either
//! joins the current accumulator or closes it and starts a new one.
//!
//! - [`merge_adjacent`] joins same-label spans that touch or overlap, allowing
//!   a small gap (one character by default). This repairs an entity split at
//!   a window edge or reported as several short pieces.
//! - [`merge_continuations`] joins touching same-label spans when the later
//!   one is a subword continuation (`"##g"`) or when only whitespace and
//!   dashes sit between them, e.g. `"anti"` + `"##biotic"` or `"non"` `-`
//!   `"small"`.
//!
//! Gaps are measured in characters of the document, never in bytes.

use crate::span::{sort_spans, EntitySpan};

/// Characters that may separate two pieces of one mention
pub const DEFAULT_GAP_CHARS: [char; 7] = [' ', '\t', '\r', '\n', '-', '\u{2013}', '\u{2014}'];

/// Tolerances used by the merge passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    /// Largest gap, in characters, between two spans that still counts as touching
    pub adjacency_tolerance: usize,
    /// Characters allowed in a gap between continuation pieces
    pub gap_chars: Vec<char>,
    /// Prefixes marking a subword piece glued to the previous one
    pub continuation_markers: Vec<String>,
    /// Require continuation pieces to touch (within `adjacency_tolerance`).
    ///
    /// Turning this off lets a run of gap characters of any length join two
    /// pieces, and lets a marked piece join from anywhere later in the text.
    pub require_touching: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            adjacency_tolerance: 1,
            gap_chars: DEFAULT_GAP_CHARS.to_vec(),
            continuation_markers: vec!["##".to_string()],
            require_touching: true,
        }
    }
}

impl MergePolicy {
    /// Whether `next_start` is at most `adjacency_tolerance` characters past `end`
    pub fn touches(&self, document: &str, end: usize, next_start: usize) -> bool {
        if next_start <= end.saturating_add(self.adjacency_tolerance) {
            // A character is at least one byte
            return true;
        }
        document.get(end..next_start).is_some_and(|gap| {
            gap.chars().take(self.adjacency_tolerance + 1).count() <= self.adjacency_tolerance
        })
    }

    /// Whether a piece's raw text marks it as a subword continuation
    pub fn is_continuation(&self, token_text: &str) -> bool {
        self.continuation_markers
            .iter()
            .any(|marker| !marker.is_empty() && token_text.starts_with(marker.as_str()))
    }

    /// Whether `document[from..to]` holds only gap characters.
    ///
    /// An empty or inverted range (touching or overlapping spans) is trivial.
    pub fn is_trivial_gap(&self, document: &str, from: usize, to: usize) -> bool {
        if to <= from {
            return true;
        }
        match document.get(from..to) {
            Some(gap) => gap.chars().all(|c| self.gap_chars.contains(&c)),
            None => false,
        }
    }

    fn continues(&self, current: &EntitySpan, next: &EntitySpan, document: &str) -> bool {
        if next.label != current.label {
            return false;
        }
        if self.require_touching && !self.touches(document, current.end, next.start) {
            return false;
        }
        self.is_continuation(&next.token_text)
            || self.is_trivial_gap(document, current.end, next.start)
    }
}

/// Merge touching same-label spans.
///
/// On a join the end and score take the maxima, the raw `token_text` keeps
/// the longer of the two candidates and `text` is re-read from `document`.
pub fn merge_adjacent(
    mut spans: Vec<EntitySpan>,
    document: &str,
    policy: &MergePolicy,
) -> Vec<EntitySpan> {
    sort_spans(&mut spans);

    let mut merged = Vec::with_capacity(spans.len());
    let mut iter = spans.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };

    for span in iter {
        if span.label == current.label && policy.touches(document, current.end, span.start) {
            current.absorb(&span, document);
            if span.token_text.chars().count() > current.token_text.chars().count() {
                current.token_text = span.token_text;
            }
        } else {
            merged.push(std::mem::replace(&mut current, span));
        }
    }
    merged.push(current);

    merged
}

/// Glue subword continuations and trivially separated pieces.
///
/// Every emitted span has `text` set to the document slice of its final
/// range and an empty `token_text`, so a document that itself contains a
/// marker such as `"##"` never reads as a continuation on a later pass.
pub fn merge_continuations(
    mut spans: Vec<EntitySpan>,
    document: &str,
    policy: &MergePolicy,
) -> Vec<EntitySpan> {
    sort_spans(&mut spans);

    let mut merged: Vec<EntitySpan> = Vec::with_capacity(spans.len());
    for mut span in spans {
        if let Some(last) = merged.last_mut() {
            if policy.continues(last, &span, document) {
                last.absorb(&span, document);
                last.token_text.clear();
                continue;
            }
        }

        span.reslice(document);
        span.token_text.clear();
        merged.push(span);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(doc: &str, label: &str, start: usize, end: usize, score: f32) -> EntitySpan {
        EntitySpan::from_document(doc, label, start, end, score, &doc[start..end]).unwrap()
    }

    fn piece(doc: &str, label: &str, start: usize, end: usize, score: f32, raw: &str) -> EntitySpan {
        EntitySpan::from_document(doc, label, start, end, score, raw).unwrap()
    }

    #[test]
    fn test_adjacent_same_label_merge() {
        let doc = "New York is big";
        let merged = merge_adjacent(
            vec![span(doc, "LOC", 4, 8, 0.7), span(doc, "LOC", 0, 3, 0.9)],
            doc,
            &MergePolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].range(), 0..8);
        assert_eq!(merged[0].text, "New York");
        assert_eq!(merged[0].score, 0.9);
    }

    #[test]
    fn test_adjacent_gap_tolerance() {
        let doc = "New  York";
        let merged = merge_adjacent(
            vec![span(doc, "LOC", 0, 3, 0.7), span(doc, "LOC", 5, 9, 0.9)],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(merged.len(), 2);

        let wide = MergePolicy {
            adjacency_tolerance: 2,
            ..MergePolicy::default()
        };
        let merged = merge_adjacent(
            vec![span(doc, "LOC", 0, 3, 0.7), span(doc, "LOC", 5, 9, 0.9)],
            doc,
            &wide,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "New  York");
    }

    #[test]
    fn test_adjacent_label_mismatch_splits() {
        let doc = "Paris Hilton";
        let merged = merge_adjacent(
            vec![span(doc, "LOC", 0, 5, 0.7), span(doc, "PER", 6, 12, 0.9)],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_adjacent_keeps_longer_raw_text() {
        let doc = "acetylsalicylic acid";
        let merged = merge_adjacent(
            vec![
                piece(doc, "CHEMICAL", 0, 15, 0.8, "acetylsalicylic"),
                piece(doc, "CHEMICAL", 10, 20, 0.6, "##ic acid"),
            ],
            doc,
            &MergePolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].token_text, "acetylsalicylic");
        assert_eq!(merged[0].text, "acetylsalicylic acid");
    }

    #[test]
    fn test_adjacent_overlap_keeps_max_end() {
        let doc = "small cell lung carcinoma";
        let merged = merge_adjacent(
            vec![span(doc, "DISEASE", 0, 25, 0.4), span(doc, "DISEASE", 6, 10, 0.9)],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].range(), 0..25);
        assert_eq!(merged[0].score, 0.9);
    }

    #[test]
    fn test_continuation_marker_joins() {
        let doc = "Smokers get lung cancer often.";
        let merged = merge_continuations(
            vec![
                piece(doc, "DISEASE", 12, 15, 0.88, "lun"),
                piece(doc, "DISEASE", 15, 23, 0.93, "##g cancer"),
            ],
            doc,
            &MergePolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "lung cancer");
        assert!(merged[0].token_text.is_empty());
        assert_eq!(merged[0].score, 0.93);
    }

    #[test]
    fn test_continuation_across_dash_and_space() {
        let doc = "non\u{2013}small\tcell";
        let en_dash_end = "non\u{2013}".len();
        let merged = merge_continuations(
            vec![
                span(doc, "DISEASE", 0, 3, 0.5),
                span(doc, "DISEASE", en_dash_end, en_dash_end + 5, 0.6),
                span(doc, "DISEASE", doc.len() - 4, doc.len(), 0.7),
            ],
            doc,
            &MergePolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, doc);
        assert_eq!(merged[0].score, 0.7);
    }

    #[test]
    fn test_distant_marked_piece_stays_separate() {
        let doc = "Lung biopsy was clean. Months later the patient developed colitis";
        let itis = doc.len() - 4;
        let merged = merge_continuations(
            vec![
                piece(doc, "DISEASE", 0, 4, 0.8, "Lung"),
                piece(doc, "DISEASE", itis, doc.len(), 0.7, "##itis"),
            ],
            doc,
            &MergePolicy::default(),
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "Lung");
        assert_eq!(merged[1].text, "itis");
    }

    #[test]
    fn test_marker_in_document_is_not_a_continuation() {
        let doc = "Item,##5";
        let once = merge_continuations(
            vec![
                piece(doc, "ID", 0, 4, 0.6, "Item"),
                piece(doc, "ID", 5, 8, 0.7, "# # 5"),
            ],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(once.len(), 2);
        assert_eq!(once[1].text, "##5");

        let twice = merge_continuations(once.clone(), doc, &MergePolicy::default());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_continuation_rejects_other_punctuation() {
        let doc = "insulin, glucose";
        let merged = merge_continuations(
            vec![span(doc, "CHEMICAL", 0, 7, 0.5), span(doc, "CHEMICAL", 9, 16, 0.6)],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "insulin");
        assert_eq!(merged[1].text, "glucose");
    }

    #[test]
    fn test_continuation_gap_chars_are_literal() {
        // Non-breaking space is whitespace but not in the observed gap set
        let doc = "lung\u{00a0}cancer";
        let second = "lung\u{00a0}".len();
        let merged = merge_continuations(
            vec![
                span(doc, "DISEASE", 0, 4, 0.5),
                span(doc, "DISEASE", second, doc.len(), 0.6),
            ],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_continuation_require_touching() {
        let doc = "lung    cancer";
        let spans = vec![span(doc, "DISEASE", 0, 4, 0.5), span(doc, "DISEASE", 8, 14, 0.6)];

        let strict = merge_continuations(spans.clone(), doc, &MergePolicy::default());
        assert_eq!(strict.len(), 2);

        let loose = MergePolicy {
            require_touching: false,
            ..MergePolicy::default()
        };
        let merged = merge_continuations(spans, doc, &loose);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, doc);
    }

    #[test]
    fn test_adjacency_counts_characters() {
        // U+2011 NON-BREAKING HYPHEN is one character but three bytes
        let doc = "IL\u{2011}6 levels";
        let six = "IL\u{2011}".len();
        let merged = merge_adjacent(
            vec![span(doc, "GENE", 0, 2, 0.8), span(doc, "GENE", six, six + 1, 0.6)],
            doc,
            &MergePolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "IL\u{2011}6");
    }

    #[test]
    fn test_touches() {
        let policy = MergePolicy::default();
        let doc = "a\u{00e9}b  c";
        assert!(policy.touches(doc, 1, 1));
        assert!(policy.touches(doc, 1, 0));
        assert!(policy.touches(doc, 1, 3));
        assert!(policy.touches(doc, 4, 5));
        assert!(!policy.touches(doc, 4, 6));
    }

    #[test]
    fn test_continuation_label_mismatch() {
        let doc = "lung cancer";
        let merged = merge_continuations(
            vec![
                piece(doc, "ANATOMY", 0, 4, 0.5, "lung"),
                piece(doc, "DISEASE", 5, 11, 0.6, "##cancer"),
            ],
            doc,
            &MergePolicy::default(),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_custom_continuation_marker() {
        // SentencePiece-style tokenizers mark word starts instead; a policy
        // can still name any prefix that means "glue to previous"
        let doc = "antibiotic";
        let policy = MergePolicy {
            continuation_markers: vec!["@@".to_string()],
            ..MergePolicy::default()
        };
        assert!(policy.is_continuation("@@biotic"));
        assert!(!policy.is_continuation("##biotic"));

        let merged = merge_continuations(
            vec![
                piece(doc, "CHEMICAL", 0, 4, 0.5, "anti"),
                piece(doc, "CHEMICAL", 4, 10, 0.6, "@@biotic"),
            ],
            doc,
            &policy,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "antibiotic");
    }

    #[test]
    fn test_trivial_gap() {
        let policy = MergePolicy::default();
        let doc = "a - b,c";
        assert!(policy.is_trivial_gap(doc, 1, 4));
        assert!(policy.is_trivial_gap(doc, 4, 4));
        assert!(policy.is_trivial_gap(doc, 4, 2));
        assert!(!policy.is_trivial_gap(doc, 5, 6));
    }
}
