//! Tokenizer and classifier selection for the CLI

use crate::config::{CliConfig, ModelConfig};
use crate::error::CliError;
use anyhow::Result;
use chunkner_api::capability::{
    BasicTokenizer, Classifier, CommandClassifier, LexiconClassifier, Tokenizer,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Source of entity detections
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Dictionary classifier backed by a lexicon file
    Lexicon(PathBuf),
    /// External program speaking the pipeline JSON protocol
    Command(String),
}

impl ModelSource {
    /// Pick the model from command-line flags, falling back to the config file
    pub fn resolve(
        lexicon: Option<&PathBuf>,
        command: Option<&String>,
        config: &ModelConfig,
    ) -> Result<Self> {
        if let Some(path) = lexicon {
            return Ok(ModelSource::Lexicon(path.clone()));
        }
        if let Some(line) = command {
            return Ok(ModelSource::Command(line.clone()));
        }
        match (&config.lexicon, &config.command) {
            (Some(_), Some(_)) => Err(CliError::ConfigError(
                "model.lexicon and model.command are mutually exclusive".to_string(),
            )
            .into()),
            (Some(path), None) => Ok(ModelSource::Lexicon(path.clone())),
            (None, Some(line)) => Ok(ModelSource::Command(line.clone())),
            (None, None) => Err(CliError::ModelError(
                "no model configured: pass --lexicon or --command, or set [model] in the config file"
                    .to_string(),
            )
            .into()),
        }
    }

    /// Get the display name for the model source
    pub fn display_name(&self) -> String {
        match self {
            ModelSource::Lexicon(path) => format!("Lexicon: {}", path.display()),
            ModelSource::Command(line) => format!("Command: {line}"),
        }
    }

    /// Instantiate the classifier
    pub fn load(&self) -> Result<Arc<dyn Classifier>> {
        let classifier: Arc<dyn Classifier> = match self {
            ModelSource::Lexicon(path) => {
                let lexicon = LexiconClassifier::from_path(path).map_err(|e| {
                    CliError::ModelError(format!("{}: {e}", path.display()))
                })?;
                log::info!(
                    "Loaded lexicon {} with {} labels",
                    path.display(),
                    lexicon.len()
                );
                Arc::new(lexicon)
            }
            ModelSource::Command(line) => {
                let command = CommandClassifier::from_command_line(line)
                    .map_err(|e| CliError::ModelError(e.to_string()))?;
                Arc::new(command)
            }
        };
        Ok(classifier)
    }
}

/// Source of token offsets
#[derive(Debug, Clone, PartialEq)]
pub enum TokenizerSource {
    /// Built-in word/punctuation tokenizer
    Basic {
        /// Special tokens reserved per window
        special_tokens: usize,
    },
    /// HuggingFace `tokenizer.json`
    HuggingFace(PathBuf),
}

impl TokenizerSource {
    /// Pick the tokenizer from the command line, falling back to the config file
    pub fn resolve(tokenizer: Option<&PathBuf>, config: &CliConfig) -> Self {
        match tokenizer.or(config.model.tokenizer.as_ref()) {
            Some(path) => TokenizerSource::HuggingFace(path.clone()),
            None => TokenizerSource::Basic {
                special_tokens: config.windowing.special_tokens,
            },
        }
    }

    /// Get the display name for the tokenizer source
    pub fn display_name(&self) -> String {
        match self {
            TokenizerSource::Basic { special_tokens } => {
                format!("Basic ({special_tokens} special tokens)")
            }
            TokenizerSource::HuggingFace(path) => format!("HuggingFace: {}", path.display()),
        }
    }

    /// Instantiate the tokenizer
    pub fn load(&self) -> Result<Arc<dyn Tokenizer>> {
        match self {
            TokenizerSource::Basic { special_tokens } => Ok(Arc::new(
                BasicTokenizer::new().with_special_tokens(*special_tokens),
            )),
            #[cfg(feature = "hf-tokenizer")]
            TokenizerSource::HuggingFace(path) => {
                let tokenizer = chunkner_api::capability::HfTokenizer::from_file(path)
                    .map_err(|e| CliError::ModelError(e.to_string()))?;
                Ok(Arc::new(tokenizer))
            }
            #[cfg(not(feature = "hf-tokenizer"))]
            TokenizerSource::HuggingFace(path) => Err(CliError::ModelError(format!(
                "cannot load {}: chunkner was built without the `hf-tokenizer` feature",
                path.display()
            ))
            .into()),
        }
    }

    /// Whether HuggingFace tokenizers are compiled in
    pub fn huggingface_available() -> bool {
        cfg!(feature = "hf-tokenizer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_win_over_config() {
        let config = ModelConfig {
            command: Some("python3 ner.py".to_string()),
            ..Default::default()
        };
        let lexicon = PathBuf::from("terms.toml");

        let source = ModelSource::resolve(Some(&lexicon), None, &config).unwrap();
        assert_eq!(source, ModelSource::Lexicon(lexicon));

        let source = ModelSource::resolve(None, None, &config).unwrap();
        assert_eq!(source.display_name(), "Command: python3 ner.py");
    }

    #[test]
    fn test_missing_and_conflicting_models() {
        let err = ModelSource::resolve(None, None, &ModelConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no model configured"));

        let config = ModelConfig {
            lexicon: Some(PathBuf::from("terms.toml")),
            command: Some("ner".to_string()),
            ..Default::default()
        };
        assert!(ModelSource::resolve(None, None, &config).is_err());
    }

    #[test]
    fn test_missing_lexicon_file() {
        let source = ModelSource::Lexicon(PathBuf::from("/nonexistent/lexicon.toml"));
        let err = source.load().err().expect("expected load error");
        assert!(err.to_string().starts_with("Model error:"));
    }

    #[test]
    fn test_basic_tokenizer_from_config() {
        let mut config = CliConfig::default();
        config.windowing.special_tokens = 3;

        let source = TokenizerSource::resolve(None, &config);
        assert_eq!(source, TokenizerSource::Basic { special_tokens: 3 });
        assert_eq!(source.load().unwrap().num_special_tokens_overhead(), 3);
    }

    #[cfg(not(feature = "hf-tokenizer"))]
    #[test]
    fn test_huggingface_requires_feature() {
        let source = TokenizerSource::HuggingFace(PathBuf::from("tokenizer.json"));
        let err = source.load().err().expect("expected load error");
        assert!(err.to_string().contains("hf-tokenizer"));
        assert!(!TokenizerSource::huggingface_available());
    }
}
