//! chunkner command-line entry point

use chunkner_cli::commands::Commands;
use clap::Parser;

/// Windowed named-entity recognition for long documents
#[derive(Debug, Parser)]
#[command(name = "chunkner", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = cli.command.execute() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
