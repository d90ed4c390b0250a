//! # Vehicle Index
//!
//! A chained hash table keyed by license plate. Vehicles are owned by an
//! arena (`Vec<Vehicle>`); each bucket is a chain of [`VehicleId`]s into it.
//!
//! ## Hashing
//!
//! djb2: `h = h * 33 + byte`, seeded at 5381, wrapping on overflow. The
//! bucket is `h % bucket_count`.
//!
//! ## Growth
//!
//! Before inserting, if `len / bucket_count` exceeds the configured load
//! factor, the bucket array doubles. A fresh array is allocated, every id is
//! moved into its new chain, and the new array replaces the old one. Vehicle
//! payloads stay where they are in the arena.

use park_core::{EventId, LicensePlate, VehicleId};

/// djb2 string hash.
pub fn djb2(input: &str) -> u64 {
    input
        .bytes()
        .fold(5381u64, |h, c| h.wrapping_mul(33).wrapping_add(u64::from(c)))
}

// ─── Vehicle ─────────────────────────────────────────────────────────

/// A vehicle and its own event history.
#[derive(Debug, Clone)]
pub struct Vehicle {
    plate: LicensePlate,
    history: Vec<EventId>,
}

impl Vehicle {
    /// The vehicle's plate.
    pub fn plate(&self) -> &LicensePlate {
        &self.plate
    }

    /// Entry and exit events of this vehicle, in append order.
    pub fn history(&self) -> &[EventId] {
        &self.history
    }

    /// The most recent event, which decides whether the vehicle is parked.
    pub fn last_event(&self) -> Option<EventId> {
        self.history.last().copied()
    }

    pub(crate) fn record(&mut self, event: EventId) {
        self.history.push(event);
    }
}

// ─── Index ───────────────────────────────────────────────────────────

/// Hash table of vehicles keyed by plate, with chaining and doubling growth.
#[derive(Debug, Clone)]
pub struct VehicleIndex {
    vehicles: Vec<Vehicle>,
    buckets: Vec<Vec<VehicleId>>,
    max_load_factor: f64,
}

impl VehicleIndex {
    /// An empty index with `buckets` chains (at least one).
    pub fn new(buckets: usize, max_load_factor: f64) -> Self {
        Self {
            vehicles: Vec::new(),
            buckets: vec![Vec::new(); buckets.max(1)],
            max_load_factor,
        }
    }

    /// Number of vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether no vehicle has been indexed.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Current number of chains.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// `len / bucket_count`.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    fn bucket_of(plate: &str, bucket_count: usize) -> usize {
        // bucket_count >= 1, so the remainder always fits in usize.
        (djb2(plate) % bucket_count as u64) as usize
    }

    /// Look up a vehicle by plate.
    pub fn find(&self, plate: &str) -> Option<VehicleId> {
        self.buckets
            .get(Self::bucket_of(plate, self.bucket_count()))?
            .iter()
            .copied()
            .find(|id| {
                self.get(*id)
                    .is_some_and(|vehicle| vehicle.plate.as_str() == plate)
            })
    }

    /// Look up a vehicle by plate, creating it with an empty history if it
    /// is not indexed yet.
    pub fn find_or_create(&mut self, plate: &LicensePlate) -> VehicleId {
        if let Some(id) = self.find(plate.as_str()) {
            return id;
        }
        if self.load_factor() > self.max_load_factor {
            self.grow(self.bucket_count() * 2);
        }

        let id = VehicleId::new(self.vehicles.len());
        self.vehicles.push(Vehicle {
            plate: plate.clone(),
            history: Vec::new(),
        });
        let bucket = Self::bucket_of(plate.as_str(), self.bucket_count());
        if let Some(chain) = self.buckets.get_mut(bucket) {
            chain.push(id);
        }
        id
    }

    /// The vehicle in arena slot `id`.
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.get())
    }

    pub(crate) fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id.get())
    }

    /// All vehicles in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, &Vehicle)> {
        self.vehicles
            .iter()
            .enumerate()
            .map(|(idx, vehicle)| (VehicleId::new(idx), vehicle))
    }

    /// Rehash every id into `new_size` fresh chains.
    fn grow(&mut self, new_size: usize) {
        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); new_size]);
        for id in old.into_iter().flatten() {
            let Some(vehicle) = self.vehicles.get(id.get()) else {
                continue;
            };
            let bucket = Self::bucket_of(vehicle.plate.as_str(), new_size);
            if let Some(chain) = self.buckets.get_mut(bucket) {
                chain.push(id);
            }
        }
        tracing::debug!(
            vehicles = self.len(),
            buckets = new_size,
            "vehicle index grown"
        );
    }
}

impl Default for VehicleIndex {
    fn default() -> Self {
        Self::new(
            park_core::config::DEFAULT_VEHICLE_BUCKETS,
            park_core::config::DEFAULT_MAX_LOAD_FACTOR,
        )
    }
}
