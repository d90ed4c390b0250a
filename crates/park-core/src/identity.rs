//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the parking ledger.
//!
//! - [`LicensePlate`] — validated at construction; three two-character
//!   groups separated by `-`, each group both letters or both digits, with
//!   at least one letter group and one digit group (`AA-00-AA`, `12-AB-34`).
//! - [`LotName`] — free-form lot name, unique within the registry.
//! - [`LotId`], [`VehicleId`], [`EventId`] — typed indices into the ledger's
//!   arenas. A `LotId` cannot be used where an `EventId` is expected.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlateError;

// ─── License plate ───────────────────────────────────────────────────

/// Length of a license plate, separators included.
pub const LICENSE_PLATE_LEN: usize = 8;

/// A license plate that passed the pattern check.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Validate and wrap a plate.
    ///
    /// # Errors
    ///
    /// Returns [`PlateError`] if `plate` does not match the pattern.
    pub fn new(plate: &str) -> Result<Self, PlateError> {
        if Self::is_valid(plate) {
            Ok(Self(plate.to_string()))
        } else {
            Err(PlateError {
                plate: plate.to_string(),
            })
        }
    }

    /// Whether `plate` matches the license plate pattern.
    pub fn is_valid(plate: &str) -> bool {
        let bytes = plate.as_bytes();
        if bytes.len() != LICENSE_PLATE_LEN || bytes[2] != b'-' || bytes[5] != b'-' {
            return false;
        }

        let mut letter_pair = false;
        let mut digit_pair = false;
        for pair in [&bytes[0..2], &bytes[3..5], &bytes[6..8]] {
            if pair.iter().all(u8::is_ascii_alphabetic) {
                letter_pair = true;
            } else if pair.iter().all(u8::is_ascii_digit) {
                digit_pair = true;
            } else {
                return false;
            }
        }
        letter_pair && digit_pair
    }

    /// The plate text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LicensePlate {
    type Error = PlateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<LicensePlate> for String {
    fn from(value: LicensePlate) -> Self {
        value.0
    }
}

impl AsRef<str> for LicensePlate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Lot name ────────────────────────────────────────────────────────

/// The name of a parking lot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotName(String);

impl LotName {
    /// Wrap a lot name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LotName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for LotName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LotName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Arena indices ───────────────────────────────────────────────────

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw arena position.
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// The raw arena position.
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, ":{}"), self.0)
            }
        }
    };
}

arena_index!(
    /// Slot of a lot in the lot registry. Never reused after removal.
    LotId,
    "lot"
);
arena_index!(
    /// Slot of a vehicle in the vehicle arena.
    VehicleId,
    "vehicle"
);
arena_index!(
    /// Position of an event in the event store.
    EventId,
    "event"
);
