//! Wealth-preserving 50/50 rebalancing.

use clmm_lp_domain::{DomainError, Holdings, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A two-sided trade; positive amounts are received, negative ones paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDelta {
    /// Change in token0.
    pub delta0: Decimal,
    /// Change in token1.
    pub delta1: Decimal,
}

/// Holdings split evenly by value at `price` (token1 per token0).
///
/// target0 = (token0 + token1 / price) / 2, target1 = price * target0
///
/// # Errors
///
/// Returns [`DomainError::NonPositivePrice`] unless `price > 0` and
/// [`DomainError::Overflow`] when a target leaves the `Decimal` range.
pub fn target_holdings(holdings: Holdings, price: Decimal) -> Result<Holdings> {
    if price <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice);
    }
    let target0 = holdings
        .amount1
        .checked_div(price)
        .and_then(|converted| holdings.amount0.checked_add(converted))
        .and_then(|wealth| wealth.checked_div(Decimal::TWO))
        .ok_or(DomainError::Overflow("rebalance target0"))?;
    let target1 = price
        .checked_mul(target0)
        .ok_or(DomainError::Overflow("rebalance target1"))?;
    Ok(Holdings::new(target0, target1))
}

/// Trade that moves `holdings` to the 50/50 split at `price`.
///
/// # Errors
///
/// Same conditions as [`target_holdings`].
pub fn compute_rebalance_trade(holdings: Holdings, price: Decimal) -> Result<TradeDelta> {
    let target = target_holdings(holdings, price)?;
    let delta0 = target.amount0.checked_sub(holdings.amount0);
    let delta1 = target.amount1.checked_sub(holdings.amount1);
    match (delta0, delta1) {
        (Some(delta0), Some(delta1)) => Ok(TradeDelta { delta0, delta1 }),
        _ => Err(DomainError::Overflow("rebalance trade")),
    }
}
