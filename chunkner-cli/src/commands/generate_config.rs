//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Also write a starter lexicon and point the configuration at it
    #[arg(long, value_name = "FILE")]
    pub lexicon: Option<PathBuf>,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        let template = self.generate_template();
        write_file(&self.output, &template)?;

        if let Some(lexicon) = &self.lexicon {
            println!("  Lexicon file: {}", lexicon.display());
            write_file(lexicon, LEXICON_TEMPLATE)?;
        }

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file to pick a model and window sizes");
        println!("2. Validate your configuration:");
        println!("   chunkner validate -c {}", self.output.display());
        println!("3. Use it for processing:");
        println!("   chunkner process -i input.txt -c {}", self.output.display());

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> String {
        let model = match &self.lexicon {
            Some(path) => format!("lexicon = {:?}", lexicon_reference(&self.output, path)),
            None => "# lexicon = \"lexicon.toml\"".to_string(),
        };

        format!(
            r###"# chunkner configuration

[windowing]
# Model sequence budget, special tokens included
max_tokens = 512
# Tokens shared by consecutive windows; entities shorter than this are
# always seen whole by at least one window
stride_tokens = 128
# Special tokens the basic tokenizer reserves per window ([CLS] and [SEP])
special_tokens = 2

[merge]
# Same-label spans at most this many characters apart are merged
adjacency_tolerance = 1
# Continuation pieces must touch the previous piece; false lets runs of
# gap characters of any length join pieces
require_touching = true
continuation_markers = ["##"]
# Characters allowed between two pieces of one mention
gap_chars = " \t\r\n-–—"

[model]
# Choose exactly one classifier.
# Dictionary matcher, path relative to this file:
{model}
# External program: reads a chunk on stdin and prints a JSON array of
# {{"entity_group", "score", "word", "start", "end"}} objects
# command = "python3 ner.py"
# HuggingFace tokenizer.json (requires the hf-tokenizer feature)
# tokenizer = "tokenizer.json"

[output]
# text, json or markdown
default_format = "text"
include_metadata = false
pretty_json = true
trim_input = true

[performance]
# Classify windows in parallel once parallel_threshold windows are planned
parallel = false
parallel_threshold = 8
# 0 = one thread per CPU
worker_threads = 0
"###
        )
    }
}

const LEXICON_TEMPLATE: &str = r#"# chunkner lexicon
#
# Each [[entity]] block tags every case-insensitive occurrence of its terms.
# When terms overlap, the longest one wins.

[[entity]]
label = "DISEASE"
score = 0.9
terms = ["lung cancer", "asthma", "headache"]

[[entity]]
label = "CHEMICAL"
terms = ["aspirin", "cisplatin"]
"#;

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write to {}", path.display()))
}

/// Path of the lexicon as written into the config file
fn lexicon_reference(config: &Path, lexicon: &Path) -> PathBuf {
    match (config.parent(), lexicon.parent()) {
        (Some(a), Some(b)) if a == b => lexicon.file_name().map(PathBuf::from).unwrap_or_default(),
        _ => std::path::absolute(lexicon).unwrap_or_else(|_| lexicon.to_path_buf()),
    }
}
