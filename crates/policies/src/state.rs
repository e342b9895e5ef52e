//! Lifecycle state and running statistics of a liquidity policy.

use clmm_lp_domain::{DomainError, Holdings, Position, PositionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a policy stands in the rebalance → invest → withdraw → collect → burn
/// cycle.
///
/// Each variant carries only the data that is meaningful in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No position, holdings not yet rebalanced.
    #[default]
    Idle,
    /// Rebalancing trade emitted.
    Rebalanced {
        /// Wallet wealth in token0 when the trade was emitted.
        wealth_before: Decimal,
    },
    /// Liquidity provided; the position is monitored every step.
    Invested {
        /// Range the liquidity was provided into.
        position: Position,
    },
    /// Withdrawal emitted for the position.
    Withdrawn {
        /// Range of the withdrawn position.
        position: Position,
        /// Ownership token being unwound.
        position_id: PositionId,
    },
    /// Fee collection emitted for the position.
    Collected {
        /// Range of the withdrawn position.
        position: Position,
        /// Ownership token being unwound.
        position_id: PositionId,
    },
}

impl LifecycleState {
    /// Field-less stage of this state.
    #[must_use]
    pub fn stage(&self) -> LifecycleStage {
        match self {
            LifecycleState::Idle => LifecycleStage::Idle,
            LifecycleState::Rebalanced { .. } => LifecycleStage::Rebalanced,
            LifecycleState::Invested { .. } => LifecycleStage::Invested,
            LifecycleState::Withdrawn { .. } => LifecycleStage::Withdrawn,
            LifecycleState::Collected { .. } => LifecycleStage::Collected,
        }
    }

    /// The held position, if any.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        match self {
            LifecycleState::Invested { position }
            | LifecycleState::Withdrawn { position, .. }
            | LifecycleState::Collected { position, .. } => Some(position),
            LifecycleState::Idle | LifecycleState::Rebalanced { .. } => None,
        }
    }
}

/// Field-less mirror of [`LifecycleState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStage {
    Idle,
    Rebalanced,
    Invested,
    Withdrawn,
    Collected,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStage::Idle => "IDLE",
            LifecycleStage::Rebalanced => "REBALANCED",
            LifecycleStage::Invested => "INVESTED",
            LifecycleStage::Withdrawn => "WITHDRAWN",
            LifecycleStage::Collected => "COLLECTED",
        };
        f.pad(name)
    }
}

/// Running counters of a policy. Counters never decrease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatedStats {
    /// Sum of absolute wealth changes across rebalancing trades, in token0.
    swap_volume: Decimal,
    /// Number of rebalancing trades.
    swap_count: u64,
    /// Wallet holdings at the first investment.
    hodl_baseline: Option<Holdings>,
}

impl AccumulatedStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total swap volume, in token0.
    #[must_use]
    pub fn swap_volume(&self) -> Decimal {
        self.swap_volume
    }

    /// Number of rebalancing trades.
    #[must_use]
    pub fn swap_count(&self) -> u64 {
        self.swap_count
    }

    /// Hold-only baseline, once an investment has happened.
    #[must_use]
    pub fn hodl_baseline(&self) -> Option<Holdings> {
        self.hodl_baseline
    }

    /// Records one rebalancing trade that moved wallet wealth by `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if a counter would overflow; the
    /// stats are left unchanged.
    pub fn record_swap(&mut self, volume: Decimal) -> clmm_lp_domain::Result<()> {
        let swap_volume = self
            .swap_volume
            .checked_add(volume.abs())
            .ok_or(DomainError::Overflow("swap volume"))?;
        let swap_count = self
            .swap_count
            .checked_add(1)
            .ok_or(DomainError::Overflow("swap count"))?;
        self.swap_volume = swap_volume;
        self.swap_count = swap_count;
        Ok(())
    }

    /// Sets the hold-only baseline unless one already exists.
    pub fn capture_baseline(&mut self, holdings: Holdings) {
        self.hodl_baseline.get_or_insert(holdings);
    }
}
