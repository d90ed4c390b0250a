//! # Session
//!
//! Reads command lines, applies them to a [`Model`] and writes one rendered
//! result (or one error message) per command. Rejections never end the
//! session; only `q`, end of input, or an I/O failure does.

use std::io::{BufRead, Write};

use serde::Serialize;

use park_core::{LotName, ParkError};
use park_ledger::{EntryReceipt, ExitReceipt, HistoryLine, LotBilling, LotSummary, Model};

use crate::command::{Command, CommandError};
use crate::render::{self, OutputFormat};

/// The successful result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// `p` with no arguments.
    Lots(Vec<LotSummary>),
    /// `p` with arguments.
    Created(LotSummary),
    /// `e`.
    Entered(EntryReceipt),
    /// `s`.
    Exited(ExitReceipt),
    /// `v`.
    History(Vec<HistoryLine>),
    /// `f`.
    Billing(LotBilling),
    /// `r`: the lots that remain, sorted by name.
    Removed(Vec<LotName>),
}

/// Why a command produced no outcome.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// The line could not be read.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The ledger refused the operation.
    #[error(transparent)]
    Ledger(#[from] ParkError),
}

/// Whether to keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// `q` was given.
    Quit,
}

/// Apply one parsed command to the model.
///
/// Returns `None` for `q`.
///
/// # Errors
///
/// Returns the ledger's rejection, converted to [`ParkError`].
pub fn execute(model: &mut Model, command: Command) -> Result<Option<Outcome>, ParkError> {
    let outcome = match command {
        Command::Quit => return Ok(None),
        Command::ListLots => Outcome::Lots(model.list_lots()),
        Command::CreateLot {
            name,
            capacity,
            first_block_rate,
            block_rate,
            day_cap,
        } => Outcome::Created(model.create_lot(
            &name,
            capacity,
            first_block_rate,
            block_rate,
            day_cap,
        )?),
        Command::Enter {
            lot,
            plate,
            timestamp,
        } => Outcome::Entered(model.register_entrance(&plate, &lot, timestamp)?),
        Command::Exit {
            lot,
            plate,
            timestamp,
        } => Outcome::Exited(model.register_exit(&plate, &lot, timestamp)?),
        Command::History { plate } => Outcome::History(model.vehicle_history(&plate)?),
        Command::Billing { lot, day } => Outcome::Billing(model.lot_billing(&lot, day)?),
        Command::RemoveLot { lot } => Outcome::Removed(model.remove_lot(&lot)?),
    };
    Ok(Some(outcome))
}

/// An interactive ledger bound to an output sink.
#[derive(Debug)]
pub struct Session<W> {
    model: Model,
    out: W,
    format: OutputFormat,
}

impl<W: Write> Session<W> {
    /// Start a session over `model`, writing to `out`.
    pub fn new(model: Model, out: W, format: OutputFormat) -> Self {
        Self { model, out, format }
    }

    /// The ledger as it stands.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Finish the session, returning the ledger and the sink.
    pub fn into_parts(self) -> (Model, W) {
        (self.model, self.out)
    }

    /// Process one input line.
    ///
    /// # Errors
    ///
    /// Only fails if writing to the sink fails.
    pub fn handle_line(&mut self, line: &str) -> std::io::Result<Flow> {
        let command = match Command::parse(line) {
            Ok(Some(Command::Quit)) => return Ok(Flow::Quit),
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(error) => {
                self.reject(line, &error.into())?;
                return Ok(Flow::Continue);
            }
        };
        match execute(&mut self.model, command) {
            Ok(Some(outcome)) => render::outcome(&mut self.out, &outcome, self.format)?,
            Ok(None) => return Ok(Flow::Quit),
            Err(error) => self.reject(line, &error.into())?,
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn reject(&mut self, line: &str, rejection: &Rejection) -> std::io::Result<()> {
        tracing::debug!(line = line.trim_end(), %rejection, "command rejected");
        render::rejection(&mut self.out, rejection, self.format)?;
        self.out.flush()
    }

    /// Process every line of `input` until `q` or end of input.
    ///
    /// Bytes that are not UTF-8 are replaced with U+FFFD and the line is
    /// handled like any other. Returns the number of lines read.
    ///
    /// # Errors
    ///
    /// Fails on a read or write error.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> std::io::Result<usize> {
        let mut count = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            count += 1;
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw);
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
        }
        tracing::info!(lines = count, "session finished");
        Ok(count)
    }
}
