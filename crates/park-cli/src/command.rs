//! # Command Language
//!
//! One command per line. The first non-blank character selects the command
//! and the rest of the line holds its arguments, separated by whitespace.
//! A lot name may be wrapped in double quotes to contain spaces.
//!
//! Date and time literals that cannot be read are passed on as
//! [`Timestamp::UNREADABLE`] / [`Date::UNREADABLE`]. The ledger rejects them
//! as invalid dates after its lot and vehicle checks.
//!
//! ```text
//! q
//! p [<name> <capacity> <first> <block> <cap>]
//! e <name> <plate> <DD-MM-YYYY> <HH:MM>
//! s <name> <plate> <DD-MM-YYYY> <HH:MM>
//! v <plate>
//! f <name> [<DD-MM-YYYY>]
//! r <name>
//! ```

use thiserror::Error;

use park_core::{Amount, AmountError, Date, Timestamp};

/// A line that names a known command but cannot be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A required argument is absent.
    #[error("{command}: missing {argument}.")]
    MissingArgument {
        /// The command letter.
        command: char,
        /// What was expected.
        argument: &'static str,
    },

    /// Capacity is not an integer.
    #[error("{input}: invalid capacity.")]
    InvalidCapacity {
        /// The rejected literal.
        input: String,
    },

    /// A price is not a decimal number.
    #[error("invalid cost.")]
    InvalidAmount(#[from] AmountError),
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `q`: end the session.
    Quit,
    /// `p`: list every lot.
    ListLots,
    /// `p name capacity first block cap`: create a lot.
    CreateLot {
        name: String,
        capacity: i64,
        first_block_rate: Amount,
        block_rate: Amount,
        day_cap: Amount,
    },
    /// `e name plate date time`: register an entrance.
    Enter {
        lot: String,
        plate: String,
        timestamp: Timestamp,
    },
    /// `s name plate date time`: register an exit.
    Exit {
        lot: String,
        plate: String,
        timestamp: Timestamp,
    },
    /// `v plate`: list a vehicle's stays.
    History { plate: String },
    /// `f name [date]`: a lot's takings.
    Billing { lot: String, day: Option<Date> },
    /// `r name`: remove a lot.
    RemoveLot { lot: String },
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for blank lines and unknown command letters.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if a known command has missing or
    /// unreadable arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_start();
        let mut chars = line.chars();
        let Some(letter) = chars.next() else {
            return Ok(None);
        };
        let mut args = Args {
            command: letter,
            tokens: tokenize(chars.as_str()).into_iter(),
        };

        let command = match letter {
            'q' => Self::Quit,
            'p' => match args.optional() {
                None => Self::ListLots,
                Some(name) => Self::CreateLot {
                    name,
                    capacity: args.capacity()?,
                    first_block_rate: args.amount("first block rate")?,
                    block_rate: args.amount("block rate")?,
                    day_cap: args.amount("day cap")?,
                },
            },
            'e' => {
                let (lot, plate, timestamp) = args.crossing()?;
                Self::Enter {
                    lot,
                    plate,
                    timestamp,
                }
            }
            's' => {
                let (lot, plate, timestamp) = args.crossing()?;
                Self::Exit {
                    lot,
                    plate,
                    timestamp,
                }
            }
            'v' => Self::History {
                plate: args.required("licence plate")?,
            },
            'f' => Self::Billing {
                lot: args.required("parking name")?,
                day: args.optional().map(|day| read_date(&day)),
            },
            'r' => Self::RemoveLot {
                lot: args.required("parking name")?,
            },
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

struct Args {
    command: char,
    tokens: std::vec::IntoIter<String>,
}

impl Args {
    fn optional(&mut self) -> Option<String> {
        self.tokens.next()
    }

    fn required(&mut self, argument: &'static str) -> Result<String, CommandError> {
        self.tokens.next().ok_or(CommandError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn capacity(&mut self) -> Result<i64, CommandError> {
        let input = self.required("capacity")?;
        input
            .parse()
            .map_err(|_| CommandError::InvalidCapacity { input })
    }

    fn amount(&mut self, argument: &'static str) -> Result<Amount, CommandError> {
        Ok(self.required(argument)?.parse()?)
    }

    fn crossing(&mut self) -> Result<(String, String, Timestamp), CommandError> {
        let lot = self.required("parking name")?;
        let plate = self.required("licence plate")?;
        let date = self.required("date")?;
        let time = self.required("time")?;
        let timestamp = Timestamp::parse(&date, &time).unwrap_or_else(|err| {
            tracing::debug!(%err, "unreadable timestamp");
            Timestamp::UNREADABLE
        });
        Ok((lot, plate, timestamp))
    }
}

fn read_date(input: &str) -> Date {
    input.parse().unwrap_or_else(|err| {
        tracing::debug!(%err, "unreadable date");
        Date::UNREADABLE
    })
}

/// Split on whitespace, keeping double-quoted runs together.
///
/// An unterminated quote runs to the end of the line.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let (token, tail) = match rest.strip_prefix('"') {
            Some(quoted) => quoted.split_once('"').unwrap_or((quoted, "")),
            None => rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, "")),
        };
        tokens.push(token.to_string());
        rest = tail.trim_start();
    }
    tokens
}
