//! # Queries
//!
//! Read-only views over the event store: a vehicle's stays across every lot
//! it has used, and a lot's takings either per day or itemized for one day.

use serde::Serialize;

use park_core::{
    merge_sort_by, Amount, Date, HistoryError, LicensePlate, LotError, LotName, TimeOfDay,
    Timestamp,
};

use crate::model::Model;

/// Exit half of a [`HistoryLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryExit {
    /// When the vehicle left.
    pub time: Timestamp,
    /// Fee charged.
    pub cost: Amount,
}

/// One stay of a vehicle: its entry and, once it has left, its exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryLine {
    /// Lot name at the time of the stay. Survives removal of the lot.
    pub lot_name: LotName,
    /// When the vehicle entered.
    pub entry: Timestamp,
    /// The closing exit, if any.
    pub exit: Option<HistoryExit>,
}

/// Sum of all exit fees a lot collected on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    /// The day.
    pub day: Date,
    /// Fees collected.
    pub total: Amount,
}

/// One exit on a billing day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitLine {
    /// The departing vehicle.
    pub plate: LicensePlate,
    /// Time of the exit.
    pub time: TimeOfDay,
    /// Fee charged.
    pub cost: Amount,
}

/// Result of [`Model::lot_billing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum LotBilling {
    /// One total per day with at least one exit, in event order.
    Daily(Vec<DailyTotal>),
    /// Every exit of the requested day, in event order.
    Itemized(Vec<ExitLine>),
}

impl Model {
    /// Every stay of a vehicle, ordered by lot name. Stays at the same lot
    /// keep their chronological order.
    ///
    /// # Errors
    ///
    /// [`HistoryError::InvalidPlate`] on a malformed plate,
    /// [`HistoryError::NoEntries`] if the vehicle never entered a lot.
    pub fn vehicle_history(&self, plate: &str) -> Result<Vec<HistoryLine>, HistoryError> {
        let plate = LicensePlate::new(plate)
            .map_err(|error| HistoryError::InvalidPlate { plate: error.plate })?;
        let vehicle = self
            .vehicles
            .find(plate.as_str())
            .and_then(|id| self.vehicles.get(id))
            .filter(|vehicle| !vehicle.history().is_empty())
            .ok_or_else(|| HistoryError::NoEntries {
                plate: plate.to_string(),
            })?;

        let mut lines = Vec::new();
        let mut events = self.events.resolve(vehicle.history()).peekable();
        while let Some(event) = events.next() {
            if !event.is_entry() {
                continue;
            }
            let exit = events
                .next_if(|next| !next.is_entry())
                .and_then(|next| {
                    next.cost().map(|cost| HistoryExit {
                        time: next.timestamp(),
                        cost,
                    })
                });
            lines.push(HistoryLine {
                lot_name: event.lot_name().clone(),
                entry: event.timestamp(),
                exit,
            });
        }
        Ok(merge_sort_by(lines, |a, b| a.lot_name.cmp(&b.lot_name)))
    }

    /// Takings of a lot.
    ///
    /// Without a day, one [`DailyTotal`] per run of consecutive exits on the
    /// same day. With a day, each exit of that day.
    ///
    /// # Errors
    ///
    /// [`LotError::NotFound`] if no lot has this name.
    /// [`LotError::InvalidDate`] if `day` is not a real date or starts after
    /// the clock. Before any event has been accepted every day is in the
    /// future.
    pub fn lot_billing(&self, name: &str, day: Option<Date>) -> Result<LotBilling, LotError> {
        let lot = self
            .lots
            .find(name)
            .and_then(|id| self.lots.get(id))
            .ok_or_else(|| LotError::NotFound {
                name: name.to_string(),
            })?;
        let exits = self
            .events
            .resolve(lot.history())
            .filter_map(|event| event.cost().map(|cost| (event, cost)));

        let Some(day) = day else {
            let mut totals: Vec<DailyTotal> = Vec::new();
            for (event, cost) in exits {
                let date = event.timestamp().date;
                match totals.last_mut() {
                    Some(last) if last.day.same_day(&date) => last.total += cost,
                    _ => totals.push(DailyTotal {
                        day: date,
                        total: cost,
                    }),
                }
            }
            return Ok(LotBilling::Daily(totals));
        };

        let start = Timestamp::start_of(day);
        let reached = self
            .clock
            .is_some_and(|clock| start.total_minutes() <= clock.total_minutes());
        if !day.is_valid() || !reached {
            return Err(LotError::InvalidDate);
        }
        let lines = exits
            .filter(|(event, _)| event.timestamp().date.same_day(&day))
            .filter_map(|(event, cost)| {
                self.vehicles.get(event.vehicle()).map(|vehicle| ExitLine {
                    plate: vehicle.plate().clone(),
                    time: event.timestamp().time,
                    cost,
                })
            })
            .collect();
        Ok(LotBilling::Itemized(lines))
    }
}
