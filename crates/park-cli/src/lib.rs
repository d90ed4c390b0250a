//! # park-cli — Console Front End for the Parking Ledger
//!
//! Provides the `park` binary: a line-oriented session that reads the
//! single-letter command language from stdin or a file and prints one
//! result per command.
//!
//! ## Commands
//!
//! - `q` — end the session.
//! - `p` — list lots, or create one.
//! - `e` / `s` — register a vehicle entrance / exit.
//! - `v` — list a vehicle's stays.
//! - `f` — a lot's takings per day, or itemized for one day.
//! - `r` — remove a lot and list the remaining names.
//!
//! ## Crate Policy
//!
//! - Parsing (`command.rs`) and rendering (`render.rs`) are separated from
//!   the ledger. Every rule lives in `park-ledger`.
//! - Text output matches the console format exactly.

pub mod command;
pub mod render;
pub mod session;

use std::path::Path;

use anyhow::Context;

use park_core::ParkConfig;

pub use command::{Command, CommandError};
pub use render::OutputFormat;
pub use session::{execute, Flow, Outcome, Rejection, Session};

/// Load the configuration file if one was given, the defaults otherwise.
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid configuration.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ParkConfig> {
    let Some(path) = path else {
        return Ok(ParkConfig::default());
    };
    let config = ParkConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        max_lots = config.max_lots,
        vehicle_buckets = config.vehicle_buckets,
        max_load_factor = config.max_load_factor,
        "configuration loaded"
    );
    Ok(config)
}
