//! Validate command implementation

use crate::config::CliConfig;
use crate::model_source::{ModelSource, TokenizerSource};
use anyhow::Result;
use chunkner_api::capability::LexiconClassifier;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("target").required(true).multiple(true)))]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(short, long, value_name = "FILE", group = "target")]
    pub config: Option<PathBuf>,

    /// Lexicon file to validate
    #[arg(long, value_name = "FILE", group = "target")]
    pub lexicon: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        let mut lexicons = Vec::new();

        if let Some(path) = &self.config {
            println!("Validating configuration: {}", path.display());
            let loaded = CliConfig::from_file(path)
                .and_then(|config| config.to_api_config().map(|api| (config, api)));
            let config = match loaded {
                Ok((config, api)) => {
                    println!("✓ Configuration is valid!");
                    println!(
                        "  Windows: {} tokens, stride {}",
                        api.max_tokens(),
                        api.stride_tokens()
                    );
                    config
                }
                Err(e) => {
                    println!("✗ Configuration is invalid!");
                    println!("  Error: {e:#}");
                    return Err(anyhow::anyhow!("Validation failed: {e:#}"));
                }
            };

            let tokenizer = TokenizerSource::resolve(None, &config);
            println!("  Tokenizer: {}", tokenizer.display_name());
            match ModelSource::resolve(None, None, &config.model) {
                Ok(ModelSource::Lexicon(path)) => lexicons.push(path),
                Ok(model) => println!("  Model: {}", model.display_name()),
                Err(_) => println!("  Model: none (pass --lexicon or --command when processing)"),
            }
        }

        lexicons.extend(self.lexicon.iter().cloned());
        for path in &lexicons {
            println!("Validating lexicon: {}", path.display());
            match LexiconClassifier::from_path(path) {
                Ok(lexicon) => {
                    println!("✓ Lexicon is valid!");
                    println!(
                        "  Labels: {}",
                        lexicon.labels().collect::<Vec<_>>().join(", ")
                    );
                }
                Err(e) => {
                    println!("✗ Lexicon is invalid!");
                    println!("  Error: {e}");
                    return Err(anyhow::anyhow!("Validation failed: {}", e));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", contents).unwrap();
        temp_file
    }

    #[test]
    fn test_validate_valid_config() {
        let config = write_temp("[windowing]\nmax_tokens = 128\nstride_tokens = 32\n");
        let args = ValidateArgs {
            config: Some(config.path().to_path_buf()),
            lexicon: None,
        };
        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_validate_invalid_stride() {
        let config = write_temp("[windowing]\nmax_tokens = 128\nstride_tokens = 200\n");
        let args = ValidateArgs {
            config: Some(config.path().to_path_buf()),
            lexicon: None,
        };
        let err = args.execute().unwrap_err();
        assert!(err.to_string().contains("stride"));
    }

    #[test]
    fn test_validate_lexicon() {
        let good = write_temp("[[entity]]\nlabel = \"GENE\"\nterms = [\"EGFR\"]\n");
        let bad = write_temp("[[entity]]\nlabel = \"GENE\"\nterms = []\n");

        let args = ValidateArgs {
            config: None,
            lexicon: Some(good.path().to_path_buf()),
        };
        assert!(args.execute().is_ok());

        let args = ValidateArgs {
            config: None,
            lexicon: Some(bad.path().to_path_buf()),
        };
        assert!(args.execute().is_err());
    }

    #[test]
    fn test_validate_follows_configured_lexicon() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("terms.toml"), "not toml [").unwrap();
        let config = dir.path().join("chunkner.toml");
        std::fs::write(&config, "[model]\nlexicon = \"terms.toml\"\n").unwrap();

        let args = ValidateArgs {
            config: Some(config),
            lexicon: None,
        };
        assert!(args.execute().is_err());
    }
}
