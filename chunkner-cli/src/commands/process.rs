//! Process command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::model_source::{ModelSource, TokenizerSource};
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use chunkner_api::capability::ExecutionMode;
use chunkner_api::{Input, NerProcessor};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: text, or `output.default_format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Lexicon file for dictionary-based detection
    #[arg(long, value_name = "FILE", conflicts_with = "command")]
    pub lexicon: Option<PathBuf>,

    /// External classifier command; reads a chunk on stdin, writes JSON to stdout
    #[arg(long, value_name = "COMMAND", env = "CHUNKNER_COMMAND")]
    pub command: Option<String>,

    /// HuggingFace tokenizer.json to window by model tokens
    #[arg(long, value_name = "FILE")]
    pub tokenizer: Option<PathBuf>,

    /// Model sequence budget, special tokens included
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens: Option<usize>,

    /// Tokens shared by consecutive windows
    #[arg(long, value_name = "TOKENS")]
    pub stride: Option<usize>,

    /// Classify windows in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads (implies --parallel)
    #[arg(short, long, value_name = "COUNT")]
    pub threads: Option<usize>,

    /// Include processing metadata in JSON output
    #[arg(long)]
    pub metadata: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines: source, start, end, label, score, text
    Text,
    /// JSON array with one object per document
    Json,
    /// Markdown table per document
    Markdown,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        // Initialize logging based on verbosity
        self.init_logging();

        log::info!("Starting entity extraction");
        log::debug!("Arguments: {:?}", self);

        let config = self.effective_config()?;
        let format = self.resolve_format(&config)?;
        let mode = self.execution_mode(&config);
        let api_config = config.api_config(mode)?;
        if mode != ExecutionMode::Sequential {
            log::info!(
                "Execution mode {mode} with {} worker threads",
                config.worker_threads().unwrap_or_else(num_cpus::get)
            );
        }

        let model = ModelSource::resolve(
            self.lexicon.as_ref(),
            self.command.as_ref(),
            &config.model,
        )?;
        let tokenizer = TokenizerSource::resolve(self.tokenizer.as_ref(), &config);
        log::info!("Model: {}", model.display_name());
        log::info!("Tokenizer: {}", tokenizer.display_name());

        let processor = NerProcessor::with_shared(api_config, tokenizer.load()?, model.load()?)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} files to process", files.len());

        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };
        let mut formatter = self.create_formatter(format, &config, writer);

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let mut total_entities = 0;
        for path in &files {
            let source = path.display().to_string();
            log::debug!("{source}: {} bytes", FileReader::file_size(path)?);

            let text = FileReader::read_text(path)?;
            if text.trim().is_empty() {
                log::warn!("{source}: no readable text");
            }

            let output = processor
                .process(Input::from_text(text))
                .map_err(|e| CliError::ProcessingError(format!("{source}: {e}")))?;
            log::info!(
                "{source}: {} entities from {} windows ({} mode, {} ms)",
                output.len(),
                output.metadata.windows,
                output.metadata.mode_used,
                output.metadata.processing_time_ms
            );

            formatter.format_document(&source, &output)?;
            total_entities += output.len();
            progress.file_completed(&source, output.len());
        }

        formatter.finish()?;
        progress.finish();
        log::info!("Extracted {total_entities} entities from {} files", files.len());

        Ok(())
    }

    /// Configuration file values with command-line overrides applied
    pub fn effective_config(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;

        if let Some(max_tokens) = self.max_tokens {
            config.windowing.max_tokens = max_tokens;
        }
        if let Some(stride) = self.stride {
            config.windowing.stride_tokens = stride;
        }
        if self.parallel || self.threads.is_some() {
            config.performance.parallel = true;
        }
        if let Some(threads) = self.threads {
            config.performance.worker_threads = threads;
        }
        if self.metadata {
            config.output.include_metadata = true;
        }

        Ok(config)
    }

    /// Execution mode for the given configuration
    ///
    /// `--parallel` forces parallel execution; the config file's
    /// `performance.parallel` leaves the choice to the window count.
    pub fn execution_mode(&self, config: &CliConfig) -> ExecutionMode {
        if self.parallel || self.threads.is_some() {
            ExecutionMode::Parallel
        } else {
            config.execution_mode()
        }
    }

    fn resolve_format(&self, config: &CliConfig) -> Result<OutputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => OutputFormat::from_str(&config.output.default_format, true).map_err(|_| {
                CliError::ConfigError(format!(
                    "unknown output.default_format '{}' (expected text, json or markdown)",
                    config.output.default_format
                ))
                .into()
            }),
        }
    }

    fn create_formatter(
        &self,
        format: OutputFormat,
        config: &CliConfig,
        writer: Box<dyn Write + Send + Sync>,
    ) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(
                JsonFormatter::new(writer)
                    .with_metadata(config.output.include_metadata)
                    .pretty(config.output.pretty_json),
            ),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}
