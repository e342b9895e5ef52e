//! Read-only telemetry derived from lifecycle state and the current observation.

use crate::error::Result;
use crate::observation::PoolObservation;
use crate::state::{AccumulatedStats, LifecycleState};
use clmm_lp_domain::metrics::impermanent_loss::impermanent_loss;
use clmm_lp_domain::metrics::wealth::wealth_in_token1;
use clmm_lp_domain::{DomainError, Holdings, PoolId, PositionId, PositionInfo};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named numeric value published to a telemetry sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Signal name.
    pub name: String,
    /// Signal value.
    pub value: Decimal,
}

impl Signal {
    /// Creates a signal.
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Derives the ordered signal set of a liquidity policy.
///
/// Signals are recomputed from scratch every call; the reporter keeps no
/// state of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalReporter {
    report_impermanent_loss: bool,
}

impl SignalReporter {
    /// Creates a reporter, optionally appending the impermanent-loss signal.
    #[must_use]
    pub fn new(report_impermanent_loss: bool) -> Self {
        Self {
            report_impermanent_loss,
        }
    }

    /// Computes the signals for `pool` in the given lifecycle state.
    ///
    /// In order: `LP fees earned`, `<token0> Price`, `<token0> Holdings`,
    /// `<token0> Holdings in <token1>`, `Wallet <token0>`, `Wallet <token1>`,
    /// `Swap count`, `Swap volume` and, when enabled, `Impermanent loss`.
    /// All values are quoted in token1. Position-derived values are zero while
    /// no position is held or the environment does not report it.
    ///
    /// # Errors
    ///
    /// Fails when the observation cannot quote the pool price or a value
    /// leaves the `Decimal` range.
    pub fn compute_signals(
        &self,
        state: &LifecycleState,
        stats: &AccumulatedStats,
        obs: &dyn PoolObservation,
        pool: &PoolId,
    ) -> Result<Vec<Signal>> {
        let tokens = obs.pool_tokens(pool)?;
        let price = obs.price(&tokens.token0, &tokens.token1, pool)?;

        let lp = held_position_id(state, obs)
            .and_then(|id| obs.position(id))
            .map(|info| LpValues::from_info(&info))
            .unwrap_or_default();
        let wallet = Holdings::new(
            obs.wallet_balance(&tokens.token0),
            obs.wallet_balance(&tokens.token1),
        );

        let fees_earned = wealth_in_token1(lp.fees, price)?;
        let holdings_value = lp
            .quantities
            .amount0
            .checked_mul(price)
            .ok_or(DomainError::Overflow("LP holdings value"))?;

        let mut signals = vec![
            Signal::new("LP fees earned", fees_earned),
            Signal::new(format!("{} Price", tokens.token0), price),
            Signal::new(format!("{} Holdings", tokens.token0), lp.quantities.amount0),
            Signal::new(
                format!("{} Holdings in {}", tokens.token0, tokens.token1),
                holdings_value,
            ),
            Signal::new(format!("Wallet {}", tokens.token0), wallet.amount0),
            Signal::new(format!("Wallet {}", tokens.token1), wallet.amount1),
            Signal::new("Swap count", Decimal::from(stats.swap_count())),
            Signal::new("Swap volume", stats.swap_volume()),
        ];

        if self.report_impermanent_loss {
            let loss = match stats.hodl_baseline() {
                Some(baseline) => {
                    let current = wallet.checked_add(lp.quantities)?.checked_add(lp.fees)?;
                    impermanent_loss(current, baseline, price)?
                }
                None => Decimal::ZERO,
            };
            signals.push(Signal::new("Impermanent loss", loss));
        }

        Ok(signals)
    }
}

#[derive(Debug, Default)]
struct LpValues {
    quantities: Holdings,
    fees: Holdings,
}

impl LpValues {
    fn from_info(info: &PositionInfo) -> Self {
        Self {
            quantities: Holdings::new(info.amount0, info.amount1),
            fees: Holdings::new(info.fees0, info.fees1),
        }
    }
}

fn held_position_id(state: &LifecycleState, obs: &dyn PoolObservation) -> Option<PositionId> {
    match state {
        LifecycleState::Idle | LifecycleState::Rebalanced { .. } => None,
        LifecycleState::Invested { .. } => obs.latest_position(),
        LifecycleState::Withdrawn { position_id, .. }
        | LifecycleState::Collected { position_id, .. } => Some(*position_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolicyError;
    use crate::snapshot::{PoolSnapshot, PoolState};
    use clmm_lp_domain::{Position, TickRange, TokenPair};
    use rust_decimal_macros::dec;

    fn pool() -> PoolId {
        PoolId::from("USDC/WETH")
    }

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot::new(0)
            .with_pool(PoolState::new(
                "USDC/WETH",
                TokenPair::new("WETH", "USDC"),
                10,
                TickRange::new(100, 110).unwrap(),
                dec!(2000),
            ))
            .with_balance("WETH", dec!(0.5))
            .with_balance("USDC", dec!(100))
            .with_position(PositionInfo {
                id: PositionId(1),
                pool: pool(),
                range: TickRange::new(80, 220).unwrap(),
                liquidity: 10_000,
                amount0: dec!(1),
                amount1: dec!(1500),
                fees0: dec!(0.01),
                fees1: dec!(5),
            })
    }

    fn invested() -> LifecycleState {
        LifecycleState::Invested {
            position: Position::new(TickRange::new(80, 220).unwrap(), 10).unwrap(),
        }
    }

    fn value_of<'a>(signals: &'a [Signal], name: &str) -> &'a Decimal {
        &signals.iter().find(|s| s.name == name).unwrap().value
    }

    #[test]
    fn test_signal_order_and_values() {
        let mut stats = AccumulatedStats::new();
        stats.record_swap(dec!(3)).unwrap();

        let signals = SignalReporter::new(false)
            .compute_signals(&invested(), &stats, &snapshot(), &pool())
            .unwrap();

        let names: Vec<&str> = signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "LP fees earned",
                "WETH Price",
                "WETH Holdings",
                "WETH Holdings in USDC",
                "Wallet WETH",
                "Wallet USDC",
                "Swap count",
                "Swap volume",
            ]
        );
        assert_eq!(*value_of(&signals, "LP fees earned"), dec!(25));
        assert_eq!(*value_of(&signals, "WETH Holdings"), dec!(1));
        assert_eq!(*value_of(&signals, "WETH Holdings in USDC"), dec!(2000));
        assert_eq!(*value_of(&signals, "Swap count"), dec!(1));
        assert_eq!(*value_of(&signals, "Swap volume"), dec!(3));
    }

    #[test]
    fn test_lp_values_zero_without_position() {
        let rebalanced = LifecycleState::Rebalanced {
            wealth_before: dec!(1),
        };
        let signals = SignalReporter::new(true)
            .compute_signals(&rebalanced, &AccumulatedStats::new(), &snapshot(), &pool())
            .unwrap();

        assert_eq!(*value_of(&signals, "LP fees earned"), Decimal::ZERO);
        assert_eq!(*value_of(&signals, "WETH Holdings"), Decimal::ZERO);
        assert_eq!(*value_of(&signals, "Wallet WETH"), dec!(0.5));
        assert_eq!(*value_of(&signals, "Impermanent loss"), Decimal::ZERO);
    }

    #[test]
    fn test_impermanent_loss_against_baseline() {
        let mut stats = AccumulatedStats::new();
        // Held 1.6 WETH and 3000 USDC at the first investment
        stats.capture_baseline(Holdings::new(dec!(1.6), dec!(3000)));

        let signals = SignalReporter::new(true)
            .compute_signals(&invested(), &stats, &snapshot(), &pool())
            .unwrap();

        // now: wallet 0.5 WETH + 100, LP 1 WETH + 1500, fees 0.01 WETH + 5
        // 1.51 * 2000 + 1605 = 4625; baseline 1.6 * 2000 + 3000 = 6200
        assert_eq!(signals.last().unwrap().name, "Impermanent loss");
        assert_eq!(signals.last().unwrap().value, dec!(-1575));
    }

    #[test]
    fn test_oversized_position_is_an_error() {
        let mut snapshot = snapshot();
        snapshot.positions[0].amount0 = Decimal::from(100_000_000_000_000_000_u64);
        snapshot.pools[0].price = Decimal::from(1_000_000_000_000_u64);

        let result = SignalReporter::new(false).compute_signals(
            &invested(),
            &AccumulatedStats::new(),
            &snapshot,
            &pool(),
        );
        assert_eq!(
            result,
            Err(PolicyError::Domain(DomainError::Overflow("LP holdings value")))
        );
    }

    #[test]
    fn test_withdrawn_reads_reported_position() {
        let withdrawn = LifecycleState::Withdrawn {
            position: Position::new(TickRange::new(80, 220).unwrap(), 10).unwrap(),
            position_id: PositionId(1),
        };
        let signals = SignalReporter::default()
            .compute_signals(&withdrawn, &AccumulatedStats::new(), &snapshot(), &pool())
            .unwrap();
        assert_eq!(*value_of(&signals, "WETH Holdings"), dec!(1));

        let gone = LifecycleState::Collected {
            position: Position::new(TickRange::new(80, 220).unwrap(), 10).unwrap(),
            position_id: PositionId(2),
        };
        let signals = SignalReporter::default()
            .compute_signals(&gone, &AccumulatedStats::new(), &snapshot(), &pool())
            .unwrap();
        assert_eq!(*value_of(&signals, "WETH Holdings"), Decimal::ZERO);
    }
}
