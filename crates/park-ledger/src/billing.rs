//! # Tiered Billing
//!
//! Computes the fee for one stay from its elapsed minutes and the lot's
//! [`Tariff`].
//!
//! ## Algorithm
//!
//! ```text
//! full_days = m / 1440            base    = full_days * day_cap
//! rest      = m % 1440
//! first tier: up to 4 blocks of 15 min, each charged first_block_rate in full
//! remaining : ceil(rest / 15) blocks at block_rate
//! day_fee   = min(first tier + remaining, day_cap)
//! cost      = base + day_fee
//! ```
//!
//! Each of the first four blocks costs a whole `first_block_rate`, so the
//! first hour can cost `4 * first_block_rate`. A partial trailing block is
//! charged as a whole block.

use serde::Serialize;

use park_core::{Amount, LotError, Timestamp, MINUTES_PER_DAY};

/// Length of one billing block.
pub const BLOCK_MINUTES: i64 = 15;

/// Number of leading blocks charged at `first_block_rate`.
pub const FIRST_TIER_BLOCKS: usize = 4;

// ─── Tariff ──────────────────────────────────────────────────────────

/// The three price tiers of a lot.
///
/// # Invariant
///
/// `0 < first_block_rate <= block_rate <= day_cap`, enforced by
/// [`Tariff::new`]. The billing path never re-checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tariff {
    first_block_rate: Amount,
    block_rate: Amount,
    day_cap: Amount,
}

impl Tariff {
    /// Validate and build a tariff.
    ///
    /// # Errors
    ///
    /// Returns [`LotError::InvalidRate`] if the tiers are not positive and
    /// non-decreasing.
    pub fn new(
        first_block_rate: Amount,
        block_rate: Amount,
        day_cap: Amount,
    ) -> Result<Self, LotError> {
        if !first_block_rate.is_positive() || first_block_rate > block_rate || block_rate > day_cap
        {
            return Err(LotError::InvalidRate);
        }
        Ok(Self {
            first_block_rate,
            block_rate,
            day_cap,
        })
    }

    /// Charge for each of the first four blocks of a day.
    pub fn first_block_rate(&self) -> Amount {
        self.first_block_rate
    }

    /// Charge for each block after the first hour.
    pub fn block_rate(&self) -> Amount {
        self.block_rate
    }

    /// Maximum charge for one day.
    pub fn day_cap(&self) -> Amount {
        self.day_cap
    }
}

// ─── Charge ──────────────────────────────────────────────────────────

/// Breakdown of a computed fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Charge {
    /// Whole days in the stay.
    pub full_days: i64,
    /// `full_days * day_cap`.
    pub base: Amount,
    /// Fee for the remainder of the last day, capped at `day_cap`.
    pub day_fee: Amount,
}

impl Charge {
    /// `base + day_fee`.
    pub fn total(&self) -> Amount {
        self.base + self.day_fee
    }
}

/// Break down the fee for a stay of `minutes`. Negative spans cost nothing.
pub fn charge(minutes: i64, tariff: &Tariff) -> Charge {
    let minutes = minutes.max(0);
    let full_days = minutes / MINUTES_PER_DAY;
    let base = tariff.day_cap.times(full_days);
    let mut rest = minutes % MINUTES_PER_DAY;

    let mut day_fee = Amount::ZERO;
    for _ in 0..FIRST_TIER_BLOCKS {
        if rest == 0 {
            break;
        }
        day_fee += tariff.first_block_rate;
        rest = (rest - BLOCK_MINUTES).max(0);
    }

    day_fee += tariff.block_rate.times(rest / BLOCK_MINUTES);
    if rest % BLOCK_MINUTES != 0 {
        day_fee += tariff.block_rate;
    }

    Charge {
        full_days,
        base,
        day_fee: day_fee.min(tariff.day_cap),
    }
}

/// Fee for a stay from `start` to `end`.
pub fn cost(start: &Timestamp, end: &Timestamp, tariff: &Tariff) -> Amount {
    charge(start.minutes_until(end), tariff).total()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tariff(first: i64, block: i64, cap: i64) -> Tariff {
        Tariff::new(
            Amount::from_cents(first),
            Amount::from_cents(block),
            Amount::from_cents(cap),
        )
        .unwrap()
    }

    fn standard() -> Tariff {
        tariff(100, 200, 1000)
    }

    #[test]
    fn tariff_ordering_enforced() {
        let cents = Amount::from_cents;
        assert!(Tariff::new(Amount::ZERO, cents(1), cents(2)).is_err());
        assert!(Tariff::new(cents(-1), cents(1), cents(2)).is_err());
        assert!(Tariff::new(cents(3), cents(2), cents(5)).is_err());
        assert!(Tariff::new(cents(1), cents(6), cents(5)).is_err());
        assert!(Tariff::new(cents(1), cents(1), cents(1)).is_ok());
    }

    #[test]
    fn zero_minutes_is_free() {
        assert_eq!(charge(0, &standard()).total(), Amount::ZERO);
    }

    #[test]
    fn each_first_hour_block_charged_in_full() {
        let t = standard();
        assert_eq!(charge(1, &t).total().cents(), 100);
        assert_eq!(charge(15, &t).total().cents(), 100);
        assert_eq!(charge(16, &t).total().cents(), 200);
        assert_eq!(charge(45, &t).total().cents(), 300);
        assert_eq!(charge(60, &t).total().cents(), 400);
    }

    #[test]
    fn ninety_minutes() {
        // 4 * 1.00 for the first hour, 2 * 2.00 for the next 30 minutes.
        assert_eq!(charge(90, &standard()).total().cents(), 800);
    }

    #[test]
    fn partial_trailing_block_rounds_up() {
        assert_eq!(charge(61, &standard()).total().cents(), 600);
        assert_eq!(charge(75, &standard()).total().cents(), 600);
        assert_eq!(charge(76, &standard()).total().cents(), 800);
    }

    #[test]
    fn day_fee_capped() {
        let c = charge(6 * 60, &standard());
        assert_eq!(c.full_days, 0);
        assert_eq!(c.day_fee.cents(), 1000);
    }

    #[test]
    fn full_days_charged_at_cap() {
        let c = charge(2 * MINUTES_PER_DAY + 30, &standard());
        assert_eq!(c.full_days, 2);
        assert_eq!(c.base.cents(), 2000);
        assert_eq!(c.day_fee.cents(), 200);
        assert_eq!(c.total().cents(), 2200);
    }

    #[test]
    fn exactly_one_day() {
        let c = charge(MINUTES_PER_DAY, &standard());
        assert_eq!(c.total().cents(), 1000);
        assert_eq!(c.day_fee, Amount::ZERO);
    }

    #[test]
    fn negative_span_is_free() {
        assert_eq!(charge(-30, &standard()).total(), Amount::ZERO);
    }

    #[test]
    fn cost_uses_timestamps() {
        let start = Timestamp::parse("01-01-2024", "08:00").unwrap();
        let end = Timestamp::parse("01-01-2024", "09:30").unwrap();
        assert_eq!(cost(&start, &end, &standard()).cents(), 800);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_tariff() -> impl Strategy<Value = Tariff> {
        (1i64..500, 0i64..500, 0i64..5000).prop_map(|(first, extra, cap_extra)| {
            let block = first + extra;
            let cap = block + cap_extra;
            Tariff::new(
                Amount::from_cents(first),
                Amount::from_cents(block),
                Amount::from_cents(cap),
            )
            .unwrap()
        })
    }

    proptest! {
        /// Fees are never negative and the day fee never exceeds the cap.
        #[test]
        fn bounded(t in any_tariff(), m in 0i64..(10 * MINUTES_PER_DAY)) {
            let c = charge(m, &t);
            prop_assert!(c.total() >= Amount::ZERO);
            prop_assert!(c.day_fee <= t.day_cap());
            prop_assert_eq!(c.base, t.day_cap().times(m / MINUTES_PER_DAY));
        }

        /// A longer stay never costs less.
        #[test]
        fn monotonic(t in any_tariff(), m in 0i64..(10 * MINUTES_PER_DAY), extra in 0i64..600) {
            prop_assert!(charge(m, &t).total() <= charge(m + extra, &t).total());
        }
    }
}
