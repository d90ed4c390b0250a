//! # Ledger Scenarios
//!
//! End-to-end runs against the public `Model` boundary, plus a randomized
//! check that the ledger's bookkeeping stays consistent under arbitrary
//! sequences of entrances, exits and removals.
//!
//! All scenarios use the tiers 1.00 / 2.00 / 10.00.

use park_core::{Amount, EntryError, ExitError, LotError, Timestamp};
use park_ledger::{EventKind, LotBilling, Model, VehicleState};

fn at(date: &str, time: &str) -> Timestamp {
    Timestamp::parse(date, time).expect("well-formed timestamp literal")
}

fn standard_lot(model: &mut Model, name: &str, capacity: i64) {
    model
        .create_lot(
            name,
            capacity,
            Amount::from_cents(100),
            Amount::from_cents(200),
            Amount::from_cents(1000),
        )
        .expect("lot creation should succeed");
}

#[test]
fn single_space_lot_lifecycle() {
    let mut model = Model::default();

    // 1. Create.
    let summary = model
        .create_lot(
            "Central",
            1,
            Amount::from_cents(100),
            Amount::from_cents(200),
            Amount::from_cents(1000),
        )
        .unwrap();
    assert_eq!((summary.capacity, summary.free_spaces), (1, 1));

    // 2. Enter.
    let entry = model
        .register_entrance("AA-00-AA", "Central", at("01-01-2024", "08:00"))
        .unwrap();
    assert_eq!(entry.free_spaces, 0);

    // 3. Enter again before leaving.
    standard_lot(&mut model, "Other", 5);
    assert_eq!(
        model.register_entrance("AA-00-AA", "Other", at("01-01-2024", "08:30")),
        Err(EntryError::InvalidEntry {
            plate: "AA-00-AA".into()
        })
    );

    // 4. Exit after ninety minutes.
    let exit = model
        .register_exit("AA-00-AA", "Central", at("01-01-2024", "09:30"))
        .unwrap();
    assert_eq!(exit.cost.to_string(), "8.00");
    assert_eq!(model.list_lots()[0].free_spaces, 1);

    // 5. Exit without a matching entry.
    assert_eq!(
        model.register_exit("BB-11-BB", "Central", at("01-01-2024", "10:00")),
        Err(ExitError::InvalidExit {
            plate: "BB-11-BB".into()
        })
    );
    model
        .register_entrance("CC-22-CC", "Other", at("01-01-2024", "10:00"))
        .unwrap();
    assert_eq!(
        model.register_exit("CC-22-CC", "Central", at("01-01-2024", "10:30")),
        Err(ExitError::InvalidExit {
            plate: "CC-22-CC".into()
        })
    );

    // 6. Remove the lot; history still prints, billing does not.
    model.remove_lot("Central").unwrap();
    let history = model.vehicle_history("AA-00-AA").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].lot_name.as_str(), "Central");
    assert_eq!(history[0].entry, at("01-01-2024", "08:00"));
    let exit = history[0].exit.expect("stay was closed");
    assert_eq!(exit.time, at("01-01-2024", "09:30"));
    assert_eq!(exit.cost, Amount::from_cents(800));
    assert_eq!(
        model.lot_billing("Central", None),
        Err(LotError::NotFound {
            name: "Central".into()
        })
    );
}

#[test]
fn multi_day_stay_charges_full_days_at_cap() {
    let mut model = Model::default();
    standard_lot(&mut model, "Airport", 10);
    model
        .register_entrance("AB-12-CD", "Airport", at("30-12-2023", "22:00"))
        .unwrap();
    // Crosses a year boundary: two full days plus 45 minutes.
    let exit = model
        .register_exit("AB-12-CD", "Airport", at("01-01-2024", "22:45"))
        .unwrap();
    assert_eq!(exit.cost, Amount::from_cents(2 * 1000 + 300));

    let LotBilling::Daily(totals) = model.lot_billing("Airport", None).unwrap() else {
        panic!("expected daily totals");
    };
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].day.to_string(), "01-01-2024");
    assert_eq!(totals[0].total, exit.cost);
}

#[test]
fn histories_are_shared_between_lot_and_vehicle() {
    let mut model = Model::default();
    standard_lot(&mut model, "A", 2);
    model
        .register_entrance("AA-00-AA", "A", at("01-01-2024", "08:00"))
        .unwrap();
    model
        .register_exit("AA-00-AA", "A", at("01-01-2024", "08:10"))
        .unwrap();

    let lot = model.lots().iter().next().map(|(_, lot)| lot).unwrap();
    let vehicle_id = model.vehicles().find("AA-00-AA").unwrap();
    let vehicle = model.vehicles().get(vehicle_id).unwrap();
    assert_eq!(lot.history(), vehicle.history());
    assert_eq!(model.events().len(), 2);
}

#[test]
fn lot_limit_is_configurable() {
    let config = park_core::ParkConfig::from_yaml_str("max_lots: 2\n").unwrap();
    let mut model = Model::new(&config);
    standard_lot(&mut model, "A", 1);
    standard_lot(&mut model, "B", 1);
    assert_eq!(
        model.create_lot(
            "C",
            1,
            Amount::from_cents(100),
            Amount::from_cents(200),
            Amount::from_cents(1000),
        ),
        Err(LotError::CapacityExceeded { max: 2 })
    );
}

mod invariants {
    use super::*;
    use proptest::prelude::*;

    const LOTS: [&str; 3] = ["North", "South", "West"];
    const PLATES: [&str; 5] = ["AA-00-AA", "BB-11-BB", "00-CC-00", "DD-22-DD", "EE-EE-33"];

    #[derive(Debug, Clone)]
    enum Op {
        Enter { plate: usize, lot: usize, step: u32 },
        Exit { plate: usize, lot: usize, step: u32 },
        Remove { lot: usize },
        Create { lot: usize },
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0..PLATES.len(), 0..LOTS.len(), 0u32..240)
                .prop_map(|(plate, lot, step)| Op::Enter { plate, lot, step }),
            6 => (0..PLATES.len(), 0..LOTS.len(), 0u32..240)
                .prop_map(|(plate, lot, step)| Op::Exit { plate, lot, step }),
            1 => (0..LOTS.len()).prop_map(|lot| Op::Remove { lot }),
            1 => (0..LOTS.len()).prop_map(|lot| Op::Create { lot }),
        ]
    }

    /// Minutes since 01-01-2024 00:00, folded onto the non-leap calendar.
    fn stamp(minutes: u32) -> Timestamp {
        let day = minutes / 1440;
        let rest = minutes % 1440;
        at(
            &format!("{:02}-01-2024", 1 + day % 28),
            &format!("{:02}:{:02}", rest / 60, rest % 60),
        )
    }

    proptest! {
        #[test]
        fn bookkeeping_stays_consistent(ops in prop::collection::vec(any_op(), 1..120)) {
            let mut model = Model::default();
            for lot in LOTS {
                standard_lot(&mut model, lot, 2);
            }
            let mut now = 0u32;
            let mut last_clock = model.clock();

            for op in ops {
                match op {
                    Op::Enter { plate, lot, step } => {
                        now = (now + step).min(27 * 1440);
                        let _ = model.register_entrance(PLATES[plate], LOTS[lot], stamp(now));
                    }
                    Op::Exit { plate, lot, step } => {
                        now = (now + step).min(27 * 1440);
                        let _ = model.register_exit(PLATES[plate], LOTS[lot], stamp(now));
                    }
                    Op::Remove { lot } => {
                        let _ = model.remove_lot(LOTS[lot]);
                    }
                    Op::Create { lot } => {
                        let _ = model.create_lot(
                            LOTS[lot],
                            2,
                            Amount::from_cents(100),
                            Amount::from_cents(200),
                            Amount::from_cents(1000),
                        );
                    }
                }

                // The clock never goes backwards.
                let clock = model.clock();
                if let (Some(before), Some(after)) = (last_clock, clock) {
                    prop_assert!(before.total_minutes() <= after.total_minutes());
                }
                last_clock = clock;
            }

            // Free spaces match the entries and exits recorded at each lot.
            for (_, lot) in model.lots() {
                let mut inside = 0i64;
                for id in lot.history() {
                    match model.events().get(*id).map(|e| e.kind()) {
                        Some(EventKind::Entry) => inside += 1,
                        Some(EventKind::Exit { .. }) => inside -= 1,
                        None => prop_assert!(false, "dangling event id"),
                    }
                }
                prop_assert_eq!(i64::from(lot.free_spaces()), i64::from(lot.capacity()) - inside);
            }

            // A vehicle never exits twice in a row, and every exit follows
            // an entry at the same lot.
            for (_, vehicle) in model.vehicles().iter() {
                let events: Vec<_> = model.events().resolve(vehicle.history()).collect();
                prop_assert!(events.first().is_some_and(|e| e.is_entry()));
                for pair in events.windows(2) {
                    if !pair[1].is_entry() {
                        prop_assert!(pair[0].is_entry());
                        prop_assert_eq!(pair[0].lot_name(), pair[1].lot_name());
                    }
                }
                let state = model.vehicle_state(vehicle.plate().as_str());
                if let VehicleState::Parked(lot) = state {
                    prop_assert!(model.lots().get(lot).is_some());
                }

                // With every lot still standing, entries and exits strictly
                // alternate and each exit leaves the lot just entered.
                if events.iter().all(|e| e.lot().is_some()) {
                    for (i, event) in events.iter().enumerate() {
                        prop_assert_eq!(event.is_entry(), i % 2 == 0);
                    }
                    for stay in events.chunks(2) {
                        if let [entry, exit] = stay {
                            prop_assert_eq!(entry.lot(), exit.lot());
                        }
                    }
                    let parked = match events.last() {
                        Some(last) if last.is_entry() => last.lot().map(VehicleState::Parked),
                        _ => Some(VehicleState::Free),
                    };
                    prop_assert_eq!(Some(state), parked);
                }
            }
        }
    }
}
