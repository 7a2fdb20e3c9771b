//! CLI command implementations

use crate::model_source::TokenizerSource;
use anyhow::Result;
use clap::Subcommand;

pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract named entities from text files
    Process(process::ProcessArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Write a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration or lexicon file
    Validate(validate::ValidateArgs),
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List available tokenizers
    Tokenizers,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

impl ListCommands {
    fn execute(&self) {
        match self {
            ListCommands::Formats => {
                println!("Available output formats:");
                println!("  text      Tab-separated: source, start, end, label, score, text");
                println!("  json      JSON array with one object per document");
                println!("  markdown  Markdown table per document");
            }
            ListCommands::Tokenizers => {
                println!("Available tokenizers:");
                println!("  basic        Word and punctuation tokens (default)");
                if TokenizerSource::huggingface_available() {
                    println!("  huggingface  tokenizer.json via --tokenizer");
                } else {
                    println!("  huggingface  (unavailable: rebuild with --features hf-tokenizer)");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_parse_process() {
        let cli = TestCli::try_parse_from([
            "chunkner", "process", "-i", "a.txt", "-i", "b.txt", "--lexicon", "terms.toml",
            "--stride", "64", "-f", "json", "-vv",
        ])
        .unwrap();

        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.input, vec!["a.txt", "b.txt"]);
                assert_eq!(args.stride, Some(64));
                assert_eq!(args.format, Some(process::OutputFormat::Json));
                assert_eq!(args.verbose, 2);
            }
            other => panic!("expected process, got {other:?}"),
        }
    }

    #[test]
    fn test_lexicon_conflicts_with_command() {
        let result = TestCli::try_parse_from([
            "chunkner", "process", "-i", "a.txt", "--lexicon", "terms.toml", "--command", "ner",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_needs_a_target() {
        assert!(TestCli::try_parse_from(["chunkner", "validate"]).is_err());
        assert!(TestCli::try_parse_from(["chunkner", "validate", "--lexicon", "t.toml"]).is_ok());
    }

    #[test]
    fn test_list_subcommands() {
        let cli = TestCli::try_parse_from(["chunkner", "list", "tokenizers"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                subcommand: ListCommands::Tokenizers
            }
        ));
        assert!(cli.command.execute().is_ok());
    }
}
