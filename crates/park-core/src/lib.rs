//! # park-core — Foundational Types for the Parking Ledger
//!
//! This crate is the leaf of the workspace. It defines the value types every
//! other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `LicensePlate` and
//!    `LotName` are newtypes; a plate can only be constructed through the
//!    pattern check. No bare strings cross the ledger boundary.
//!
//! 2. **Application-level time.** `Timestamp` is a calendar value supplied
//!    by the caller. Nothing in the workspace reads the wall clock.
//!
//! 3. **Fixed-point money.** `Amount` counts cents in an `i64`. Rates and
//!    fees are never floats.
//!
//! 4. **Typed arena indices.** `LotId`, `VehicleId` and `EventId` are
//!    distinct types; you cannot index the event store with a lot id.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `park-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod calendar;
pub mod config;
pub mod error;
pub mod identity;
pub mod sort;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use calendar::{Date, TimeOfDay, Timestamp, MINUTES_PER_DAY};
pub use config::ParkConfig;
pub use error::{
    AmountError, CalendarError, ConfigError, EntryError, ExitError, HistoryError, LotError,
    ParkError, PlateError,
};
pub use identity::{EventId, LicensePlate, LotId, LotName, VehicleId};
pub use sort::{merge_sort, merge_sort_by};
