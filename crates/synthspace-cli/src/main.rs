//! Developer CLI for synthspace.
//!
//! Binary name is `synthspace`; every subcommand operates on a SQLite
//! workspace database produced by `generate`.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{
    CliError,
    exchange::{ExportJsonlArgs, ImportJsonlArgs},
    generate::GenerateArgs,
    serve::ServeArgs,
    stats::StatsArgs,
    validate::ValidateDbArgs,
};

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(
    name = "synthspace",
    version,
    about = "Deterministic synthetic team-chat workspace datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

///
/// Command
///

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a synthetic workspace into SQLite
    Generate(GenerateArgs),

    /// Export a workspace to JSON + JSONL files (streaming)
    ExportJsonl(ExportJsonlArgs),

    /// Import a JSONL export directory into SQLite
    ImportJsonl(ImportJsonlArgs),

    /// Print the summary JSON for a stored workspace
    Stats(StatsArgs),

    /// Check that a SQLite file is a usable workspace database
    ValidateDb(ValidateDbArgs),

    /// Serve the HTTP read API
    Serve(ServeArgs),
}

impl Command {
    fn run(self) -> Result<ExitCode, CliError> {
        match self {
            Self::Generate(args) => args.run(),
            Self::ExportJsonl(args) => args.run(),
            Self::ImportJsonl(args) => args.run(),
            Self::Stats(args) => args.run(),
            Self::ValidateDb(args) => args.run(),
            Self::Serve(args) => args.run(),
        }
    }
}

// Logs go to stderr so stdout stays parseable for the JSON-printing
// subcommands.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    match Cli::parse().command.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
