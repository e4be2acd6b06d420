//! Cube CLI - Inspect Cube entity documents
//!
//! Usage:
//!   cube inspect <kind> <path>           - Decode a document and print its full shape
//!   cube inspect <kind> <path> --compact - Print the compact shape instead
//!   cube enums <name>                    - Print the wire table of an enum

use clap::{Parser, Subcommand};
use cli::commands::{EnumsCommand, InspectCommand};

#[derive(Parser)]
#[command(name = "cube")]
#[command(about = "Cube - Entity document codec")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a document and print it in the chosen shape
    Inspect(InspectCommand),
    /// Print the wire table of an enum
    Enums(EnumsCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Enums(cmd) => cmd.run(),
    }
}
