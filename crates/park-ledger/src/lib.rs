//! # park-ledger — Indexing and Event-Log Engine
//!
//! Owns every piece of mutable state in the parking ledger and the rules
//! that change it.
//!
//! ## Components
//!
//! - **Lot Registry** (`lot.rs`): arena of lots with a name index and an
//!   insertion-ordered doubly-linked traversal. Removed slots are tombstoned.
//!
//! - **Vehicle Index** (`vehicle.rs`): djb2 chained hash table keyed by
//!   plate, doubling when the load factor is exceeded.
//!
//! - **Event Store** (`event.rs`): append-only `Entry`/`Exit` records. Lot
//!   and vehicle histories are lists of `EventId` into it, so one record is
//!   visible from both sides.
//!
//! - **Billing** (`billing.rs`): the tiered fee for one stay.
//!
//! - **Model** (`model.rs`): the aggregate and its entrance/exit state
//!   machine, with the system clock.
//!
//! - **Queries** (`report.rs`): vehicle history and lot takings.
//!
//! ## Design
//!
//! Nothing here reads the wall clock, touches the filesystem, or prints.
//! Every operation takes already-parsed values and returns a typed result;
//! the command layer decides how to render it.

pub mod billing;
pub mod event;
pub mod lot;
pub mod model;
pub mod report;
pub mod vehicle;

// ─── Model re-exports ───────────────────────────────────────────────

pub use model::{EntryReceipt, ExitReceipt, LotSummary, Model, VehicleState};

// ─── Query re-exports ───────────────────────────────────────────────

pub use report::{DailyTotal, ExitLine, HistoryExit, HistoryLine, LotBilling};

// ─── Storage re-exports ─────────────────────────────────────────────

pub use billing::{Charge, Tariff};
pub use event::{Event, EventKind, EventLog};
pub use lot::{Lot, LotRegistry};
pub use vehicle::{Vehicle, VehicleIndex};
