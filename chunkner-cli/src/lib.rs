//! chunkner CLI library
//!
//! This library provides the command-line interface for windowed
//! named-entity recognition over documents of any length.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod model_source;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
