//! Liquidity positions.

use crate::error::{DomainError, Result};
use crate::pool::PoolId;
use crate::tick::TickRange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the ownership token that represents a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A liquidity placement held by a policy.
///
/// Both bounds are multiples of the pool tick spacing and `lower < upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    range: TickRange,
}

impl Position {
    /// Creates a position spanning `range` in a pool with `tick_spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTickSpacing`] for a non-positive spacing and
    /// [`DomainError::UnalignedTick`] when a bound is not a multiple of it.
    pub fn new(range: TickRange, tick_spacing: i32) -> Result<Self> {
        if tick_spacing <= 0 {
            return Err(DomainError::InvalidTickSpacing(tick_spacing));
        }
        for tick in [range.lower(), range.upper()] {
            if tick % tick_spacing != 0 {
                return Err(DomainError::UnalignedTick {
                    tick,
                    spacing: tick_spacing,
                });
            }
        }
        Ok(Self { range })
    }

    #[must_use]
    pub fn range(&self) -> TickRange {
        self.range
    }

    /// Whether the position still overlaps the pool's active tick range.
    ///
    /// Returns false only once the active range has moved entirely outside
    /// the held range.
    #[must_use]
    pub fn holds(&self, active: &TickRange) -> bool {
        !self.range.is_disjoint_from(active)
    }
}

/// Position metadata as reported by the pool environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Ownership token id.
    pub id: PositionId,
    /// Pool the liquidity sits in.
    pub pool: PoolId,
    /// Tick range of the position.
    pub range: TickRange,
    /// Current liquidity.
    pub liquidity: u128,
    /// Token0 currently represented by the liquidity.
    #[serde(default)]
    pub amount0: Decimal,
    /// Token1 currently represented by the liquidity.
    #[serde(default)]
    pub amount1: Decimal,
    /// Uncollected token0 fees.
    #[serde(default)]
    pub fees0: Decimal,
    /// Uncollected token1 fees.
    #[serde(default)]
    pub fees1: Decimal,
}

impl PositionInfo {
    /// Whether all liquidity has already been removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_requires_aligned_ticks() {
        let range = TickRange::new(80, 220).unwrap();
        assert!(Position::new(range, 10).is_ok());
        assert_eq!(
            Position::new(range, 60),
            Err(DomainError::UnalignedTick {
                tick: 80,
                spacing: 60
            })
        );
        assert_eq!(
            Position::new(range, 0),
            Err(DomainError::InvalidTickSpacing(0))
        );
    }

    #[test]
    fn test_position_holds() {
        let position = Position::new(TickRange::new(80, 220).unwrap(), 10).unwrap();

        assert!(position.holds(&TickRange::new(150, 160).unwrap()));
        assert!(position.holds(&TickRange::new(220, 230).unwrap()));
        assert!(!position.holds(&TickRange::new(230, 240).unwrap()));
        assert!(!position.holds(&TickRange::new(60, 70).unwrap()));
    }
}
