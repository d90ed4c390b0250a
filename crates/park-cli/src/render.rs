//! # Output Rendering
//!
//! Text mode reproduces the console format line for line: money with two
//! decimals, dates as `DD-MM-YYYY`, times as `HH:MM`, fields separated by
//! single spaces. JSON mode writes one object per command.

use std::io::{self, Write};

use park_ledger::LotBilling;

use crate::session::{Outcome, Rejection};

/// How results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Space-separated console lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Write a successful outcome.
///
/// # Errors
///
/// Propagates write failures.
pub fn outcome<W: Write>(out: &mut W, outcome: &Outcome, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => text(out, outcome),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, outcome)?;
            writeln!(out)
        }
    }
}

/// Write a rejection message.
///
/// # Errors
///
/// Propagates write failures.
pub fn rejection<W: Write>(
    out: &mut W,
    rejection: &Rejection,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{rejection}"),
        OutputFormat::Json => {
            let value = serde_json::json!({ "error": rejection.to_string() });
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)
        }
    }
}

fn text<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Lots(lots) => {
            for lot in lots {
                writeln!(out, "{} {} {}", lot.name, lot.capacity, lot.free_spaces)?;
            }
        }
        Outcome::Created(_) => {}
        Outcome::Entered(receipt) => writeln!(out, "{} {}", receipt.lot, receipt.free_spaces)?,
        Outcome::Exited(receipt) => writeln!(
            out,
            "{} {} {} {}",
            receipt.plate, receipt.entry_time, receipt.exit_time, receipt.cost
        )?,
        Outcome::History(lines) => {
            for line in lines {
                match &line.exit {
                    Some(exit) => writeln!(out, "{} {} {}", line.lot_name, line.entry, exit.time)?,
                    None => writeln!(out, "{} {}", line.lot_name, line.entry)?,
                }
            }
        }
        Outcome::Billing(LotBilling::Daily(totals)) => {
            for total in totals {
                writeln!(out, "{} {}", total.day, total.total)?;
            }
        }
        Outcome::Billing(LotBilling::Itemized(lines)) => {
            for line in lines {
                writeln!(out, "{} {} {}", line.plate, line.time, line.cost)?;
            }
        }
        Outcome::Removed(names) => {
            for name in names {
                writeln!(out, "{name}")?;
            }
        }
    }
    Ok(())
}
