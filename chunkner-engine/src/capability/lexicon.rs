//! Dictionary classifier
//!
//! Lexicon files are TOML:
//!
//! ```toml
//! [[entity]]
//! label = "CHEMICAL"
//! score = 0.95
//! terms = ["aspirin", "acetylsalicylic acid"]
//! ```

use super::Classifier;
use crate::error::InferenceError;
use chunkner_core::RawDetection;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;

fn default_score() -> f32 {
    1.0
}

/// One label and the surface forms that map to it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LexiconEntry {
    /// Entity type reported for every term
    pub label: String,
    /// Confidence reported for every match
    #[serde(default = "default_score")]
    pub score: f32,
    /// Surface forms, matched case-insensitively on word boundaries
    pub terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default, rename = "entity")]
    entities: Vec<LexiconEntry>,
}

#[derive(Debug)]
struct CompiledEntry {
    label: String,
    score: f32,
    pattern: Regex,
}

/// Classifier matching whole-word terms from a lexicon
#[derive(Debug)]
pub struct LexiconClassifier {
    entries: Vec<CompiledEntry>,
}

impl LexiconClassifier {
    /// Compile lexicon entries.
    ///
    /// Entries with an empty label, a score outside `[0, 1]`, or no
    /// non-blank terms are rejected.
    pub fn new(entries: Vec<LexiconEntry>) -> Result<Self, InferenceError> {
        let mut compiled = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.label.trim().is_empty() {
                return Err(InferenceError::message("lexicon entry has an empty label"));
            }
            if !(0.0..=1.0).contains(&entry.score) {
                return Err(InferenceError::message(format!(
                    "lexicon score for {} must be within [0, 1], got {}",
                    entry.label, entry.score
                )));
            }

            let mut terms: Vec<&str> = entry
                .terms
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect();
            if terms.is_empty() {
                return Err(InferenceError::message(format!(
                    "lexicon entry {} has no terms",
                    entry.label
                )));
            }
            // Longest first so the alternation prefers the longer mention
            terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            let source = format!(r"\b{{start-half}}(?:{alternation})\b{{end-half}}");
            let pattern = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|e| InferenceError::message(format!("invalid lexicon pattern: {e}")))?;

            compiled.push(CompiledEntry {
                label: entry.label,
                score: entry.score,
                pattern,
            });
        }

        Ok(Self { entries: compiled })
    }

    /// Parse a lexicon from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, InferenceError> {
        let file: LexiconFile = toml::from_str(source)
            .map_err(|e| InferenceError::Malformed(format!("lexicon: {e}")))?;
        Self::new(file.entities)
    }

    /// Load a lexicon file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Number of labels in the lexicon
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in lexicon order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, chunk: &str) -> Result<Vec<RawDetection>, InferenceError> {
        let mut detections = Vec::new();
        for entry in &self.entries {
            detections.extend(entry.pattern.find_iter(chunk).map(|m| {
                RawDetection::new(&entry.label, entry.score, m.start(), m.end(), m.as_str())
            }));
        }
        Ok(detections)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = r#"
[[entity]]
label = "DISEASE"
score = 0.9
terms = ["lung cancer", "cancer"]

[[entity]]
label = "CHEMICAL"
terms = ["aspirin"]
"#;

    #[test]
    fn test_parse_lexicon() {
        let lexicon = LexiconClassifier::from_toml_str(LEXICON).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.labels().collect::<Vec<_>>(), ["DISEASE", "CHEMICAL"]);
    }

    #[test]
    fn test_prefers_longest_term_and_ignores_case() {
        let lexicon = LexiconClassifier::from_toml_str(LEXICON).unwrap();
        let found = lexicon.classify("Lung Cancer patients took ASPIRIN.").unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].label, "DISEASE");
        assert_eq!((found[0].start, found[0].end), (Some(0), Some(11)));
        assert_eq!(found[0].score, 0.9);
        assert_eq!(found[1].word, "ASPIRIN");
        assert_eq!(found[1].score, 1.0);
    }

    #[test]
    fn test_whole_words_only() {
        let lexicon = LexiconClassifier::from_toml_str(LEXICON).unwrap();
        assert!(lexicon.classify("cancerous aspirins").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_entries() {
        let empty_terms = vec![LexiconEntry {
            label: "GENE".into(),
            score: 1.0,
            terms: vec!["  ".into()],
        }];
        assert!(LexiconClassifier::new(empty_terms).is_err());

        let bad_score = vec![LexiconEntry {
            label: "GENE".into(),
            score: 1.5,
            terms: vec!["EGFR".into()],
        }];
        assert!(LexiconClassifier::new(bad_score).is_err());

        assert!(matches!(
            LexiconClassifier::from_toml_str("[[entity]]\nlabel = 3"),
            Err(InferenceError::Malformed(_))
        ));
    }

    #[test]
    fn test_term_with_regex_metacharacters() {
        let lexicon = LexiconClassifier::new(vec![LexiconEntry {
            label: "GENE".into(),
            score: 0.8,
            terms: vec!["IL-6 (human)".into()],
        }])
        .unwrap();
        let found = lexicon.classify("levels of IL-6 (human) rose").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (Some(10), Some(22)));
        assert!(lexicon.classify("xIL-6 (human)").unwrap().is_empty());
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[[entity]]\nlabel = \"CHEMICAL\"\nterms = [\"aspirin\"]\n"
        )
        .unwrap();

        let lexicon = LexiconClassifier::from_path(file.path()).unwrap();
        assert_eq!(lexicon.labels().collect::<Vec<_>>(), vec!["CHEMICAL"]);
        assert!(LexiconClassifier::from_path("/nonexistent/lexicon.toml").is_err());
    }
}
