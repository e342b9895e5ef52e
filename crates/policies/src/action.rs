//! Actions a policy hands to the environment for execution.

use crate::rebalance::TradeDelta;
use clmm_lp_domain::{PoolId, PositionId, TickRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A domain action emitted by a policy.
///
/// The environment executes actions after the step returns and reports the
/// outcome (minted ids, remaining liquidity) through the next observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyAction {
    /// Swap wallet holdings into the ratio needed to provide into `tick_range`.
    TradeToTickRange {
        /// Pool to trade in.
        pool: PoolId,
        /// Wallet quantities `(token0, token1)` before the trade.
        quantities: (Decimal, Decimal),
        /// Suggested trade; positive means the account receives the token.
        trade: TradeDelta,
        /// Range the resulting holdings are meant for.
        tick_range: TickRange,
    },
    /// Mint a position providing the given quantities into `tick_range`.
    ProvideLiquidity {
        /// Pool to provide into.
        pool: PoolId,
        /// Token0 quantity.
        amount0: Decimal,
        /// Token1 quantity.
        amount1: Decimal,
        /// Range of the new position.
        tick_range: TickRange,
    },
    /// Remove liquidity from a position.
    WithdrawLiquidity {
        /// Position to withdraw from.
        position_id: PositionId,
        /// Liquidity to remove.
        liquidity: u128,
    },
    /// Collect withdrawn tokens and accrued fees of a position.
    CollectFees {
        /// Pool the position belongs to.
        pool: PoolId,
        /// Position to collect from.
        position_id: PositionId,
    },
    /// Burn the ownership token of an emptied position.
    BurnPosition {
        /// Position to burn.
        position_id: PositionId,
    },
}

/// Field-less discriminant of [`PolicyAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Trade towards a tick range.
    TradeToTickRange,
    /// Provide liquidity.
    ProvideLiquidity,
    /// Withdraw liquidity.
    WithdrawLiquidity,
    /// Collect fees.
    CollectFees,
    /// Burn a position.
    BurnPosition,
}

impl PolicyAction {
    /// Returns the kind of this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            PolicyAction::TradeToTickRange { .. } => ActionKind::TradeToTickRange,
            PolicyAction::ProvideLiquidity { .. } => ActionKind::ProvideLiquidity,
            PolicyAction::WithdrawLiquidity { .. } => ActionKind::WithdrawLiquidity,
            PolicyAction::CollectFees { .. } => ActionKind::CollectFees,
            PolicyAction::BurnPosition { .. } => ActionKind::BurnPosition,
        }
    }
}

impl fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyAction::TradeToTickRange {
                pool,
                trade,
                tick_range,
                ..
            } => write!(
                f,
                "trade {:+} / {:+} in {} towards {}",
                trade.delta0, trade.delta1, pool, tick_range
            ),
            PolicyAction::ProvideLiquidity {
                pool,
                amount0,
                amount1,
                tick_range,
            } => write!(
                f,
                "provide {} / {} into {} on {}",
                amount0, amount1, tick_range, pool
            ),
            PolicyAction::WithdrawLiquidity {
                position_id,
                liquidity,
            } => write!(f, "withdraw {} liquidity from #{}", liquidity, position_id),
            PolicyAction::CollectFees { position_id, .. } => {
                write!(f, "collect #{}", position_id)
            }
            PolicyAction::BurnPosition { position_id } => write!(f, "burn #{}", position_id),
        }
    }
}
