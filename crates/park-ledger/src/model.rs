//! # Ledger Model
//!
//! The aggregate that owns the lot registry, the vehicle index, the event
//! store and the system clock, and runs the entrance/exit state machine.
//!
//! ## Vehicle states
//!
//! ```text
//!            entrance              exit
//! Unknown ──────────▶ Parked(lot) ──────▶ Free
//!                        ▲   │               │
//!                        │   └─ lot removed ─┤
//!                        └──── entrance ─────┘
//! ```
//!
//! The state is never stored. It is read off the vehicle's last event: an
//! entry whose lot is still registered means `Parked`, anything else means
//! `Free`, and no history at all means `Unknown`.
//!
//! ## Atomicity
//!
//! Every check runs against shared borrows first. Only once all of them pass
//! does the operation take mutable borrows, create the vehicle if needed and
//! append the event. A rejected operation leaves the model untouched.
//!
//! ## Clock
//!
//! A single application-level clock. It is unset until the first accepted
//! event, after which every event must carry a timestamp at or after it.

use serde::Serialize;

use park_core::{
    merge_sort, Amount, EntryError, ExitError, LicensePlate, LotError, LotId, LotName,
    ParkConfig, Timestamp, VehicleId,
};

use crate::billing;
use crate::event::{Event, EventLog};
use crate::lot::LotRegistry;
use crate::vehicle::VehicleIndex;

// ─── Receipts ────────────────────────────────────────────────────────

/// A lot as listed by `p`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotSummary {
    /// Lot name.
    pub name: LotName,
    /// Total spaces.
    pub capacity: u32,
    /// Spaces currently free.
    pub free_spaces: u32,
}

/// Result of an accepted entrance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReceipt {
    /// The lot entered.
    pub lot: LotName,
    /// Spaces left after the entry.
    pub free_spaces: u32,
}

/// Result of an accepted exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReceipt {
    /// The departing vehicle.
    pub plate: LicensePlate,
    /// When the closed stay began.
    pub entry_time: Timestamp,
    /// When the vehicle left.
    pub exit_time: Timestamp,
    /// Fee charged.
    pub cost: Amount,
}

/// Derived state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "lot", rename_all = "snake_case")]
pub enum VehicleState {
    /// Never seen.
    Unknown,
    /// Inside the given lot.
    Parked(LotId),
    /// Outside every lot.
    Free,
}

// ─── Model ───────────────────────────────────────────────────────────

/// The whole ledger.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) lots: LotRegistry,
    pub(crate) vehicles: VehicleIndex,
    pub(crate) events: EventLog,
    pub(crate) clock: Option<Timestamp>,
}

impl Model {
    /// An empty ledger sized by `config`.
    pub fn new(config: &ParkConfig) -> Self {
        Self {
            lots: LotRegistry::new(config.max_lots),
            vehicles: VehicleIndex::new(config.vehicle_buckets, config.max_load_factor),
            events: EventLog::new(),
            clock: None,
        }
    }

    /// Timestamp of the latest accepted event, if any.
    pub fn clock(&self) -> Option<Timestamp> {
        self.clock
    }

    /// The lot registry.
    pub fn lots(&self) -> &LotRegistry {
        &self.lots
    }

    /// The vehicle index.
    pub fn vehicles(&self) -> &VehicleIndex {
        &self.vehicles
    }

    /// The event store.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ── Lots ────────────────────────────────────────────────────────

    /// Create a lot with a full set of free spaces.
    ///
    /// # Errors
    ///
    /// Checked in this order: [`LotError::Duplicate`],
    /// [`LotError::InvalidCapacity`], [`LotError::InvalidRate`],
    /// [`LotError::CapacityExceeded`].
    pub fn create_lot(
        &mut self,
        name: &str,
        capacity: i64,
        first_block_rate: Amount,
        block_rate: Amount,
        day_cap: Amount,
    ) -> Result<LotSummary, LotError> {
        let result = self
            .lots
            .create(name, capacity, first_block_rate, block_rate, day_cap);
        match &result {
            Ok(summary) => tracing::debug!(lot = %summary.name, capacity, "lot created"),
            Err(error) => tracing::debug!(lot = name, %error, "lot rejected"),
        }
        result
    }

    /// Every lot in creation order.
    pub fn list_lots(&self) -> Vec<LotSummary> {
        self.lots.iter().map(|(_, lot)| lot.summary()).collect()
    }

    /// Remove a lot and return the names of the lots that remain, sorted.
    ///
    /// The lot's events stay in the store and in vehicle histories; only
    /// their live lot reference is cleared. Vehicles parked there become
    /// free.
    ///
    /// # Errors
    ///
    /// [`LotError::NotFound`] if no lot has this name.
    pub fn remove_lot(&mut self, name: &str) -> Result<Vec<LotName>, LotError> {
        let lot = self.lots.remove(name).map_err(|error| {
            tracing::debug!(lot = name, %error, "lot removal rejected");
            error
        })?;
        self.events.detach_lot(lot.history());
        tracing::debug!(lot = name, events = lot.history().len(), "lot removed");

        let remaining = self.lots.iter().map(|(_, lot)| lot.name().clone()).collect();
        Ok(merge_sort(remaining))
    }

    // ── Vehicles ────────────────────────────────────────────────────

    /// The derived state of the vehicle with this plate.
    pub fn vehicle_state(&self, plate: &str) -> VehicleState {
        self.vehicles
            .find(plate)
            .map_or(VehicleState::Unknown, |id| self.state_of(id))
    }

    fn state_of(&self, id: VehicleId) -> VehicleState {
        let Some(last) = self
            .vehicles
            .get(id)
            .and_then(|vehicle| vehicle.last_event())
            .and_then(|event| self.events.get(event))
        else {
            return VehicleState::Unknown;
        };
        match last.lot() {
            Some(lot) if last.is_entry() && self.lots.get(lot).is_some() => {
                VehicleState::Parked(lot)
            }
            _ => VehicleState::Free,
        }
    }

    fn accepts(&self, timestamp: &Timestamp) -> bool {
        timestamp.is_valid()
            && self
                .clock
                .map_or(true, |clock| timestamp.total_minutes() >= clock.total_minutes())
    }

    // ── Entrance ────────────────────────────────────────────────────

    /// Admit a vehicle into a lot.
    ///
    /// # Errors
    ///
    /// Checked in this order: [`EntryError::NoSuchLot`],
    /// [`EntryError::LotFull`], [`EntryError::InvalidPlate`],
    /// [`EntryError::InvalidEntry`] if the vehicle is parked anywhere, and
    /// [`EntryError::InvalidDate`] if the timestamp is invalid or before
    /// the clock.
    pub fn register_entrance(
        &mut self,
        plate: &str,
        lot_name: &str,
        timestamp: Timestamp,
    ) -> Result<EntryReceipt, EntryError> {
        let result = self.try_entrance(plate, lot_name, timestamp);
        match &result {
            Ok(receipt) => tracing::debug!(
                plate,
                lot = %receipt.lot,
                free_spaces = receipt.free_spaces,
                %timestamp,
                "entrance registered"
            ),
            Err(error) => tracing::debug!(plate, lot = lot_name, %error, "entrance rejected"),
        }
        result
    }

    fn try_entrance(
        &mut self,
        plate: &str,
        lot_name: &str,
        timestamp: Timestamp,
    ) -> Result<EntryReceipt, EntryError> {
        let no_such_lot = || EntryError::NoSuchLot {
            name: lot_name.to_string(),
        };
        let lot_id = self.lots.find(lot_name).ok_or_else(no_such_lot)?;
        let lot = self.lots.get(lot_id).ok_or_else(no_such_lot)?;
        if lot.is_full() {
            return Err(EntryError::LotFull {
                name: lot_name.to_string(),
            });
        }
        let plate = LicensePlate::new(plate)
            .map_err(|error| EntryError::InvalidPlate { plate: error.plate })?;
        if let Some(vehicle) = self.vehicles.find(plate.as_str()) {
            if let VehicleState::Parked(_) = self.state_of(vehicle) {
                return Err(EntryError::InvalidEntry {
                    plate: plate.to_string(),
                });
            }
        }
        if !self.accepts(&timestamp) {
            return Err(EntryError::InvalidDate);
        }

        let lot = self.lots.get_mut(lot_id).ok_or_else(no_such_lot)?;
        let vehicle_id = self.vehicles.find_or_create(&plate);
        let event = self
            .events
            .append(Event::entry(vehicle_id, lot_id, lot.name().clone(), timestamp));
        if let Some(vehicle) = self.vehicles.get_mut(vehicle_id) {
            vehicle.record(event);
        }
        let free_spaces = lot.admit(event);
        self.clock = Some(timestamp);

        Ok(EntryReceipt {
            lot: lot.name().clone(),
            free_spaces,
        })
    }

    // ── Exit ────────────────────────────────────────────────────────

    /// Let a parked vehicle out and charge it.
    ///
    /// # Errors
    ///
    /// Checked in this order: [`ExitError::NoSuchLot`],
    /// [`ExitError::InvalidPlate`], [`ExitError::InvalidExit`] unless the
    /// vehicle is parked in this very lot, and [`ExitError::InvalidDate`].
    pub fn register_exit(
        &mut self,
        plate: &str,
        lot_name: &str,
        timestamp: Timestamp,
    ) -> Result<ExitReceipt, ExitError> {
        let result = self.try_exit(plate, lot_name, timestamp);
        match &result {
            Ok(receipt) => tracing::debug!(
                plate,
                lot = lot_name,
                cost = %receipt.cost,
                %timestamp,
                "exit registered"
            ),
            Err(error) => tracing::debug!(plate, lot = lot_name, %error, "exit rejected"),
        }
        result
    }

    fn try_exit(
        &mut self,
        plate: &str,
        lot_name: &str,
        timestamp: Timestamp,
    ) -> Result<ExitReceipt, ExitError> {
        let no_such_lot = || ExitError::NoSuchLot {
            name: lot_name.to_string(),
        };
        let lot_id = self.lots.find(lot_name).ok_or_else(no_such_lot)?;
        let plate = LicensePlate::new(plate)
            .map_err(|error| ExitError::InvalidPlate { plate: error.plate })?;
        let invalid_exit = || ExitError::InvalidExit {
            plate: plate.to_string(),
        };
        let vehicle_id = self.vehicles.find(plate.as_str()).ok_or_else(invalid_exit)?;
        if self.state_of(vehicle_id) != VehicleState::Parked(lot_id) {
            return Err(invalid_exit());
        }
        if !self.accepts(&timestamp) {
            return Err(ExitError::InvalidDate);
        }
        let entry_time = self
            .vehicles
            .get(vehicle_id)
            .and_then(|vehicle| vehicle.last_event())
            .and_then(|event| self.events.get(event))
            .map(Event::timestamp)
            .ok_or_else(invalid_exit)?;

        let lot = self.lots.get_mut(lot_id).ok_or_else(no_such_lot)?;
        let cost = billing::cost(&entry_time, &timestamp, lot.tariff());
        let event = self.events.append(Event::exit(
            vehicle_id,
            lot_id,
            lot.name().clone(),
            timestamp,
            cost,
        ));
        if let Some(vehicle) = self.vehicles.get_mut(vehicle_id) {
            vehicle.record(event);
        }
        lot.release(event);
        self.clock = Some(timestamp);

        Ok(ExitReceipt {
            plate,
            entry_time,
            exit_time: timestamp,
            cost,
        })
    }
}
