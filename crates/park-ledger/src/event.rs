//! # Event Store
//!
//! The canonical, append-only store of entry and exit events. Each accepted
//! entrance or exit appends exactly one [`Event`]; its [`EventId`] is then
//! pushed onto both the vehicle's and the lot's history, so one payload is
//! shared by two independent traversals.
//!
//! ## Lot removal
//!
//! An event keeps a snapshot of its lot's name for printing. The live
//! back-reference (`lot`) is cleared by [`EventLog::detach_lot`] when the
//! lot is removed, and is never followed afterwards.

use serde::Serialize;

use park_core::{Amount, EventId, LotId, LotName, Timestamp, VehicleId};

/// Entry or exit, with the exit's fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// The vehicle crossed into the lot.
    Entry,
    /// The vehicle left the lot and paid `cost`.
    Exit {
        /// Fee charged for the stay that this exit closes.
        cost: Amount,
    },
}

/// One entrance or exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    kind: EventKind,
    vehicle: VehicleId,
    lot: Option<LotId>,
    lot_name: LotName,
    timestamp: Timestamp,
}

impl Event {
    /// A new entry record.
    pub fn entry(vehicle: VehicleId, lot: LotId, lot_name: LotName, timestamp: Timestamp) -> Self {
        Self {
            kind: EventKind::Entry,
            vehicle,
            lot: Some(lot),
            lot_name,
            timestamp,
        }
    }

    /// A new exit record carrying its fee.
    pub fn exit(
        vehicle: VehicleId,
        lot: LotId,
        lot_name: LotName,
        timestamp: Timestamp,
        cost: Amount,
    ) -> Self {
        Self {
            kind: EventKind::Exit { cost },
            vehicle,
            lot: Some(lot),
            lot_name,
            timestamp,
        }
    }

    /// Entry or exit.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether this is an entry.
    pub fn is_entry(&self) -> bool {
        matches!(self.kind, EventKind::Entry)
    }

    /// The fee, for exits.
    pub fn cost(&self) -> Option<Amount> {
        match self.kind {
            EventKind::Exit { cost } => Some(cost),
            EventKind::Entry => None,
        }
    }

    /// The vehicle that crossed.
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// The lot, unless it has since been removed.
    pub fn lot(&self) -> Option<LotId> {
        self.lot
    }

    /// The lot's name at the time of the event.
    pub fn lot_name(&self) -> &LotName {
        &self.lot_name
    }

    /// When the crossing happened.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Append-only event store.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Store `event` and return its id.
    pub fn append(&mut self, event: Event) -> EventId {
        let id = EventId::new(self.events.len());
        self.events.push(event);
        id
    }

    /// The event with id `id`.
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.get())
    }

    /// Resolve a history list to its events, in list order.
    pub fn resolve<'a>(&'a self, ids: &'a [EventId]) -> impl Iterator<Item = &'a Event> + 'a {
        ids.iter().filter_map(|id| self.get(*id))
    }

    /// Clear the lot back-reference of every listed event.
    pub fn detach_lot(&mut self, ids: &[EventId]) {
        for id in ids {
            if let Some(event) = self.events.get_mut(id.get()) {
                event.lot = None;
            }
        }
    }

    /// All events in append order.
    pub fn iter(&self) -> impl Iterator<Item = (EventId, &Event)> {
        self.events
            .iter()
            .enumerate()
            .map(|(idx, event)| (EventId::new(idx), event))
    }
}
