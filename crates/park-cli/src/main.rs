//! # park CLI entry point
//!
//! Parses command-line arguments, installs logging on stderr, and runs a
//! ledger session over stdin or an input file.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use park_cli::{load_config, OutputFormat, Session};
use park_ledger::Model;

/// Parking ledger console.
///
/// Reads one command per line (`q p e s v f r`) and prints one result per
/// command. Rejected commands print their message and the session goes on.
#[derive(Parser, Debug)]
#[command(name = "park", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print each result as a JSON object.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let model = Model::new(&config);
    let stdout = io::stdout();
    let mut session = Session::new(model, stdout.lock(), cli.format());

    let result = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            session.run(BufReader::new(file))
        }
        None => session.run(io::stdin().lock()),
    };
    result.context("session aborted")?;
    Ok(())
}
