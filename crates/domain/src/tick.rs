//! Ticks, tick ranges and price-to-tick conversion.
//!
//! Ticks are the discrete price units of a concentrated-liquidity pool:
//! `price = 1.0001 ^ tick`. Liquidity is only ever placed between ticks that
//! are multiples of the pool tick spacing.

use crate::error::{DomainError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

const TICK_BASE: f64 = 1.0001;

/// An inclusive range of ticks with `lower < upper`.
///
/// Serialized as a `[lower, upper]` pair; deserialization rejects inverted
/// or empty ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct TickRange {
    lower: i32,
    upper: i32,
}

impl TickRange {
    /// Creates a tick range.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTickRange`] unless `lower < upper`.
    pub fn new(lower: i32, upper: i32) -> Result<Self> {
        if lower >= upper {
            return Err(DomainError::InvalidTickRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Lower tick.
    #[must_use]
    pub fn lower(&self) -> i32 {
        self.lower
    }

    /// Upper tick.
    #[must_use]
    pub fn upper(&self) -> i32 {
        self.upper
    }

    /// Whether `other` lies entirely outside this range, with no shared tick.
    #[must_use]
    pub fn is_disjoint_from(&self, other: &TickRange) -> bool {
        other.lower > self.upper || other.upper < self.lower
    }

    /// Returns the range widened by `delta` ticks on each side.
    ///
    /// Saturates at the `i32` bounds, so the result is always a valid range.
    #[must_use]
    pub fn padded(&self, delta: u32) -> Self {
        let delta = i32::try_from(delta).unwrap_or(i32::MAX);
        Self {
            lower: self.lower.saturating_sub(delta),
            upper: self.upper.saturating_add(delta),
        }
    }
}

impl TryFrom<(i32, i32)> for TickRange {
    type Error = DomainError;

    fn try_from((lower, upper): (i32, i32)) -> Result<Self> {
        Self::new(lower, upper)
    }
}

impl From<TickRange> for (i32, i32) {
    fn from(range: TickRange) -> Self {
        (range.lower, range.upper)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Rounds `tick` down to the closest multiple of `spacing`.
pub fn align_tick_down(tick: i32, spacing: i32) -> Result<i32> {
    if spacing <= 0 {
        return Err(DomainError::InvalidTickSpacing(spacing));
    }
    Ok(tick.div_euclid(spacing) * spacing)
}

/// Maps a human-readable price (token1 per token0) to the lower tick of the
/// tick-spacing bucket that contains it.
///
/// `decimals` are the on-chain decimals of `(token0, token1)`; the pool works
/// on raw units, so the price is rescaled by `10^(decimals1 - decimals0)`.
pub fn price_to_active_tick(price: Decimal, spacing: i32, decimals: (u32, u32)) -> Result<i32> {
    if price <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice);
    }
    let (decimals0, decimals1) = decimals;
    let exponent = i64::from(decimals1) - i64::from(decimals0);
    let scale = (0..exponent.unsigned_abs())
        .try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::TEN))
        .ok_or(DomainError::Overflow("decimals scale"))?;
    let raw_price = if exponent >= 0 {
        price.checked_mul(scale)
    } else {
        price.checked_div(scale)
    }
    .ok_or(DomainError::Overflow("price rescaling"))?;

    let tick = raw_tick(raw_price)?.floor() as i32;
    align_tick_down(tick, spacing)
}

fn raw_tick(price: Decimal) -> Result<f64> {
    if price <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice);
    }
    let price_f64 = price.to_f64().ok_or(DomainError::Overflow("price to f64"))?;
    Ok(price_f64.log(TICK_BASE))
}
