//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the parking ledger. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - One enum per boundary operation family (lots, entrances, exits,
//!   history queries), each variant carrying the offending name or plate.
//! - `Display` output is the exact one-line message the console prints, so
//!   the command layer never re-words a rejection.
//! - Every variant is recoverable. Validation failures never leave partial
//!   state behind.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the parking ledger.
#[derive(Error, Debug)]
pub enum ParkError {
    /// Lot creation, removal, lookup or billing failed.
    #[error(transparent)]
    Lot(#[from] LotError),

    /// A vehicle entrance was rejected.
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// A vehicle exit was rejected.
    #[error(transparent)]
    Exit(#[from] ExitError),

    /// A vehicle history query was rejected.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// A date or time literal could not be read.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A price literal could not be read.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// A license plate failed the pattern check.
    #[error(transparent)]
    Plate(#[from] PlateError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

// ─── Lot errors ──────────────────────────────────────────────────────

/// Errors raised by lot creation, removal and billing queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotError {
    /// A lot with this name already exists.
    #[error("{name}: parking already exists.")]
    Duplicate {
        /// The rejected name.
        name: String,
    },

    /// No lot with this name exists.
    #[error("{name}: no such parking.")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// Capacity was zero or negative.
    #[error("{capacity}: invalid capacity.")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: i64,
    },

    /// Price tiers violate `0 < first_block_rate <= block_rate <= day_cap`.
    #[error("invalid cost.")]
    InvalidRate,

    /// The registry already holds the maximum number of lots.
    #[error("too many parks.")]
    CapacityExceeded {
        /// Configured maximum.
        max: usize,
    },

    /// A billing day is calendrically invalid or lies after the system clock.
    #[error("invalid date.")]
    InvalidDate,
}

// ─── Entrance / exit errors ──────────────────────────────────────────

/// Errors raised by `register_entrance`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The target lot does not exist.
    #[error("{name}: no such parking.")]
    NoSuchLot {
        /// The name that was looked up.
        name: String,
    },

    /// The target lot has no free spaces.
    #[error("{name}: parking is full.")]
    LotFull {
        /// The full lot.
        name: String,
    },

    /// The plate failed the pattern check.
    #[error("{plate}: invalid licence plate.")]
    InvalidPlate {
        /// The rejected plate.
        plate: String,
    },

    /// The vehicle is already parked somewhere.
    #[error("{plate}: invalid vehicle entry.")]
    InvalidEntry {
        /// The vehicle's plate.
        plate: String,
    },

    /// The timestamp is invalid or earlier than the system clock.
    #[error("invalid date.")]
    InvalidDate,
}

/// Errors raised by `register_exit`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExitError {
    /// The target lot does not exist.
    #[error("{name}: no such parking.")]
    NoSuchLot {
        /// The name that was looked up.
        name: String,
    },

    /// The plate failed the pattern check.
    #[error("{plate}: invalid licence plate.")]
    InvalidPlate {
        /// The rejected plate.
        plate: String,
    },

    /// The vehicle is unknown, not parked, or parked at another lot.
    #[error("{plate}: invalid vehicle exit.")]
    InvalidExit {
        /// The vehicle's plate.
        plate: String,
    },

    /// The timestamp is invalid or earlier than the system clock.
    #[error("invalid date.")]
    InvalidDate,
}

/// Errors raised by `vehicle_history`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The plate failed the pattern check.
    #[error("{plate}: invalid licence plate.")]
    InvalidPlate {
        /// The rejected plate.
        plate: String,
    },

    /// The vehicle has never entered any lot.
    #[error("{plate}: no entries found in any parking.")]
    NoEntries {
        /// The vehicle's plate.
        plate: String,
    },
}

// ─── Literal parsing errors ──────────────────────────────────────────

/// A license plate did not match `XX-XX-XX` with at least one letter pair
/// and one digit pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{plate}: invalid licence plate.")]
pub struct PlateError {
    /// The rejected input.
    pub plate: String,
}

/// A date or time literal did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Expected `DD-MM-YYYY`.
    #[error("malformed date {input:?}, expected DD-MM-YYYY")]
    MalformedDate {
        /// The rejected input.
        input: String,
    },

    /// Expected `HH:MM`.
    #[error("malformed time {input:?}, expected HH:MM")]
    MalformedTime {
        /// The rejected input.
        input: String,
    },
}

/// A price literal was not a decimal number of whole cents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed amount {input:?}")]
pub struct AmountError {
    /// The rejected input.
    pub input: String,
}

// ─── Configuration errors ────────────────────────────────────────────

/// Errors loading or validating a [`ParkConfig`](crate::ParkConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML document did not match the schema.
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A field holds a value outside its permitted range.
    #[error("{field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lot_messages_match_console_output() {
        let dup = LotError::Duplicate {
            name: "Central".to_string(),
        };
        assert_eq!(dup.to_string(), "Central: parking already exists.");
        assert_eq!(
            LotError::InvalidCapacity { capacity: -3 }.to_string(),
            "-3: invalid capacity."
        );
        assert_eq!(LotError::InvalidRate.to_string(), "invalid cost.");
        assert_eq!(
            LotError::CapacityExceeded { max: 20 }.to_string(),
            "too many parks."
        );
    }

    #[test]
    fn vehicle_messages_carry_plate() {
        let e = EntryError::InvalidEntry {
            plate: "AA-00-AA".to_string(),
        };
        assert_eq!(e.to_string(), "AA-00-AA: invalid vehicle entry.");
        let x = ExitError::InvalidExit {
            plate: "AA-00-AA".to_string(),
        };
        assert_eq!(x.to_string(), "AA-00-AA: invalid vehicle exit.");
        let h = HistoryError::NoEntries {
            plate: "AA-00-AA".to_string(),
        };
        assert_eq!(h.to_string(), "AA-00-AA: no entries found in any parking.");
    }

    #[test]
    fn park_error_is_transparent_for_domain_errors() {
        let err: ParkError = EntryError::InvalidDate.into();
        assert_eq!(err.to_string(), "invalid date.");
    }
}
