//! # Fixed-Point Amounts
//!
//! Prices and fees are counted in cents in an `i64`. Floating point never
//! enters the billing path, so day totals add up exactly.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmountError;

/// A monetary amount in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Build from a count of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self * n`, saturating at the `i64` bounds.
    pub const fn times(self, n: i64) -> Self {
        Self(self.0.saturating_mul(n))
    }

    /// Parse a decimal literal such as `"2"`, `"2.5"` or `"-0.75"`.
    ///
    /// Trailing zeros past the second decimal place are accepted. Any other
    /// digit there would be a fraction of a cent and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError`] for empty input, non-digit characters,
    /// sub-cent precision or values that overflow `i64` cents.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let malformed = || AmountError {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(malformed());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(malformed());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| malformed())?
        };
        let (cents_digits, sub_cent) = frac.split_at(frac.len().min(2));
        if sub_cent.bytes().any(|b| b != b'0') {
            return Err(malformed());
        }
        let frac_cents: i64 = match cents_digits.len() {
            0 => 0,
            1 => cents_digits.parse::<i64>().map_err(|_| malformed())? * 10,
            _ => cents_digits.parse().map_err(|_| malformed())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac_cents))
            .ok_or_else(malformed)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Amount {
    /// Two decimal places: `450` cents renders as `4.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
