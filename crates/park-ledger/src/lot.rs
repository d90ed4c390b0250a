//! # Lot Registry
//!
//! Lots live in an arena of slots addressed by [`LotId`]. The slots form a
//! doubly-linked list in insertion order (`prev`/`next` ids plus a head and
//! tail), and a name index maps each [`LotName`] to its slot.
//!
//! ## Removal
//!
//! Removing a lot unlinks it, empties its slot and drops its name from the
//! index. Slot positions are never reused, so a `LotId` held by an old event
//! resolves to `None` rather than to a different lot.

use std::collections::HashMap;

use park_core::{Amount, EventId, LotError, LotId, LotName};

use crate::billing::Tariff;
use crate::model::LotSummary;

// ─── Lot ─────────────────────────────────────────────────────────────

/// A parking lot and its own event history.
#[derive(Debug, Clone)]
pub struct Lot {
    name: LotName,
    capacity: u32,
    free_spaces: u32,
    tariff: Tariff,
    history: Vec<EventId>,
    prev: Option<LotId>,
    next: Option<LotId>,
}

impl Lot {
    /// The lot's unique name.
    pub fn name(&self) -> &LotName {
        &self.name
    }

    /// Total number of spaces.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Spaces not currently occupied.
    pub fn free_spaces(&self) -> u32 {
        self.free_spaces
    }

    /// Vehicles currently inside.
    pub fn occupied(&self) -> u32 {
        self.capacity - self.free_spaces
    }

    /// Whether every space is taken.
    pub fn is_full(&self) -> bool {
        self.free_spaces == 0
    }

    /// Name, capacity and free spaces, as listed.
    pub fn summary(&self) -> LotSummary {
        LotSummary {
            name: self.name.clone(),
            capacity: self.capacity,
            free_spaces: self.free_spaces,
        }
    }

    /// The lot's price tiers.
    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Entry and exit events at this lot, in append order.
    pub fn history(&self) -> &[EventId] {
        &self.history
    }

    /// Record an accepted entry and take a space.
    pub(crate) fn admit(&mut self, event: EventId) -> u32 {
        self.history.push(event);
        self.free_spaces = self.free_spaces.saturating_sub(1);
        self.free_spaces
    }

    /// Record an accepted exit and free a space.
    pub(crate) fn release(&mut self, event: EventId) -> u32 {
        self.history.push(event);
        self.free_spaces = (self.free_spaces + 1).min(self.capacity);
        self.free_spaces
    }
}

/// A requested capacity as a space count; zero, negative and oversized
/// values are rejected.
fn checked_capacity(capacity: i64) -> Result<u32, LotError> {
    u32::try_from(capacity)
        .ok()
        .filter(|c| *c > 0)
        .ok_or(LotError::InvalidCapacity { capacity })
}

// ─── Registry ────────────────────────────────────────────────────────

/// Insertion-ordered collection of lots, keyed by name.
#[derive(Debug, Clone)]
pub struct LotRegistry {
    slots: Vec<Option<Lot>>,
    by_name: HashMap<LotName, LotId>,
    head: Option<LotId>,
    tail: Option<LotId>,
    max_lots: usize,
}

impl LotRegistry {
    /// An empty registry holding at most `max_lots` lots at once.
    pub fn new(max_lots: usize) -> Self {
        Self {
            slots: Vec::new(),
            by_name: HashMap::new(),
            head: None,
            tail: None,
            max_lots,
        }
    }

    /// Number of live lots.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no lot exists.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Maximum number of concurrent lots.
    pub fn max_lots(&self) -> usize {
        self.max_lots
    }

    /// Create a lot and append it to the insertion order.
    ///
    /// # Errors
    ///
    /// Checked in this order: [`LotError::Duplicate`],
    /// [`LotError::InvalidCapacity`], [`LotError::InvalidRate`],
    /// [`LotError::CapacityExceeded`].
    pub fn create(
        &mut self,
        name: &str,
        capacity: i64,
        first_block_rate: Amount,
        block_rate: Amount,
        day_cap: Amount,
    ) -> Result<LotSummary, LotError> {
        if self.contains(name) {
            return Err(LotError::Duplicate {
                name: name.to_string(),
            });
        }
        let capacity = checked_capacity(capacity)?;
        let tariff = Tariff::new(first_block_rate, block_rate, day_cap)?;
        if self.len() >= self.max_lots {
            return Err(LotError::CapacityExceeded { max: self.max_lots });
        }

        let id = LotId::new(self.slots.len());
        let name = LotName::new(name);
        let lot = Lot {
            name: name.clone(),
            capacity,
            free_spaces: capacity,
            tariff,
            history: Vec::new(),
            prev: self.tail,
            next: None,
        };
        let summary = lot.summary();
        self.slots.push(Some(lot));
        match self.tail.and_then(|tail| self.get_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.by_name.insert(name, id);
        Ok(summary)
    }

    /// Whether a lot called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Exact-match lookup by name.
    pub fn find(&self, name: &str) -> Option<LotId> {
        self.by_name.get(name).copied()
    }

    /// The lot in slot `id`, if it has not been removed.
    pub fn get(&self, id: LotId) -> Option<&Lot> {
        self.slots.get(id.get()).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: LotId) -> Option<&mut Lot> {
        self.slots.get_mut(id.get()).and_then(Option::as_mut)
    }

    /// Unlink and release the lot called `name`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`LotError::NotFound`] if no such lot exists.
    pub fn remove(&mut self, name: &str) -> Result<Lot, LotError> {
        let not_found = || LotError::NotFound {
            name: name.to_string(),
        };
        let id = self.by_name.remove(name).ok_or_else(not_found)?;
        let lot = self
            .slots
            .get_mut(id.get())
            .and_then(Option::take)
            .ok_or_else(not_found)?;

        match lot.prev.and_then(|prev| self.get_mut(prev)) {
            Some(prev) => prev.next = lot.next,
            None => self.head = lot.next,
        }
        match lot.next.and_then(|next| self.get_mut(next)) {
            Some(next) => next.prev = lot.prev,
            None => self.tail = lot.prev,
        }
        Ok(lot)
    }

    /// Live lots in insertion order.
    pub fn iter(&self) -> Lots<'_> {
        Lots {
            registry: self,
            cursor: self.head,
        }
    }
}

impl Default for LotRegistry {
    fn default() -> Self {
        Self::new(park_core::config::DEFAULT_MAX_LOTS)
    }
}

/// Insertion-order iterator over a [`LotRegistry`].
#[derive(Debug, Clone)]
pub struct Lots<'a> {
    registry: &'a LotRegistry,
    cursor: Option<LotId>,
}

impl<'a> Iterator for Lots<'a> {
    type Item = (LotId, &'a Lot);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let lot = self.registry.get(id)?;
        self.cursor = lot.next;
        Some((id, lot))
    }
}

impl<'a> IntoIterator for &'a LotRegistry {
    type Item = (LotId, &'a Lot);
    type IntoIter = Lots<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
