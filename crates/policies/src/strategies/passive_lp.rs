//! Passive concentrated liquidity provision.
//!
//! Trades once to the 50/50 split, provides once into a range set by price
//! bounds around the spot price, and then holds for the rest of the run.

use super::{LifecycleDriver, Transition, wealth_change};
use crate::action::PolicyAction;
use crate::config::{PassiveLpConfig, resolve_pool};
use crate::error::Result;
use crate::events::EventLog;
use crate::observation::PoolObservation;
use crate::policy::Policy;
use crate::rebalance::compute_rebalance_trade;
use crate::signals::{Signal, SignalReporter};
use crate::state::{AccumulatedStats, LifecycleStage, LifecycleState};
use crate::telemetry::{NullSink, SignalSink};
use clmm_lp_domain::metrics::wealth::wealth_in_token0;
use clmm_lp_domain::tick::price_to_active_tick;
use clmm_lp_domain::{DomainError, Holdings, PoolId, Position, TickRange};
use rust_decimal::Decimal;
use tracing::warn;

/// Liquidity provider that invests once into a fixed price band.
#[derive(Debug)]
pub struct PassiveConcentratedLp<S = NullSink> {
    config: PassiveLpConfig,
    driver: LifecycleDriver<S>,
}

impl PassiveConcentratedLp<NullSink> {
    /// Creates a policy that discards its signals.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`](crate::PolicyError::Config) when the
    /// config does not validate.
    pub fn without_telemetry(config: PassiveLpConfig) -> Result<Self> {
        Self::new(config, NullSink)
    }
}

impl<S: SignalSink> PassiveConcentratedLp<S> {
    /// Creates a policy publishing signals to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`](crate::PolicyError::Config) when the
    /// config does not validate.
    pub fn new(config: PassiveLpConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            driver: LifecycleDriver::new(SignalReporter::new(true), sink),
        })
    }

    /// The policy configuration.
    #[must_use]
    pub fn config(&self) -> &PassiveLpConfig {
        &self.config
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> LifecycleStage {
        self.driver.state.stage()
    }

    /// The telemetry sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.driver.sink
    }

    /// Position spanning `[lower_bound * spot, upper_bound * spot]`, both
    /// ends aligned down to the tick spacing.
    fn price_band(
        &self,
        obs: &dyn PoolObservation,
        pool: &PoolId,
        spot: Decimal,
    ) -> Result<Position> {
        let tokens = obs.pool_tokens(pool)?;
        let decimals = (
            obs.token_decimals(&tokens.token0)?,
            obs.token_decimals(&tokens.token1)?,
        );
        let tick_spacing = obs.tick_spacing(pool)?;

        let bound_tick = |bound: Decimal| -> Result<i32> {
            let price = bound
                .checked_mul(spot)
                .ok_or(DomainError::Overflow("price band"))?;
            Ok(price_to_active_tick(price, tick_spacing, decimals)?)
        };
        let lower = bound_tick(self.config.lower_price_bound)?;
        let upper = bound_tick(self.config.upper_price_bound)?;
        Ok(Position::new(TickRange::new(lower, upper)?, tick_spacing)?)
    }

    fn wallet(&self, obs: &dyn PoolObservation, pool: &PoolId) -> Result<(Holdings, Decimal)> {
        let tokens = obs.pool_tokens(pool)?;
        let price = obs.price(&tokens.token0, &tokens.token1, pool)?;
        let holdings = Holdings::new(
            obs.wallet_balance(&tokens.token0),
            obs.wallet_balance(&tokens.token1),
        );
        Ok((holdings, price))
    }

    fn initial_trade(&self, obs: &dyn PoolObservation, pool: &PoolId) -> Result<Transition> {
        let (holdings, price) = self.wallet(obs, pool)?;
        let wealth_before = wealth_in_token0(holdings, price)?;
        let tick_range = self.price_band(obs, pool, price)?.range();

        let action = PolicyAction::TradeToTickRange {
            pool: pool.clone(),
            quantities: (holdings.amount0, holdings.amount1),
            trade: compute_rebalance_trade(holdings, price)?,
            tick_range,
        };
        Ok(Transition::to(
            LifecycleState::Rebalanced { wealth_before },
            self.driver.stats.clone(),
            action,
        ))
    }

    fn initial_provide(
        &self,
        obs: &dyn PoolObservation,
        pool: &PoolId,
        wealth_before: Decimal,
    ) -> Result<Transition> {
        let (holdings, price) = self.wallet(obs, pool)?;
        let wealth_after = wealth_in_token0(holdings, price)?;
        let position = self.price_band(obs, pool, price)?;
        let tick_range = position.range();

        let mut stats = self.driver.stats.clone();
        stats.record_swap(wealth_change(wealth_before, wealth_after)?)?;
        stats.capture_baseline(holdings);

        let action = PolicyAction::ProvideLiquidity {
            pool: pool.clone(),
            amount0: holdings.amount0,
            amount1: holdings.amount1,
            tick_range,
        };
        Ok(Transition::to(
            LifecycleState::Invested { position },
            stats,
            action,
        ))
    }

    fn advance(&mut self, obs: &dyn PoolObservation) -> Result<Vec<PolicyAction>> {
        let pool = resolve_pool(self.config.pool.as_ref(), obs)?;
        let transition = match self.driver.state {
            LifecycleState::Idle => self.initial_trade(obs, &pool)?,
            LifecycleState::Rebalanced { wealth_before } => {
                self.initial_provide(obs, &pool, wealth_before)?
            }
            state => Transition::stay(state, &self.driver.stats),
        };
        self.driver.commit(&pool, obs, transition)
    }
}

impl<S: SignalSink> Policy for PassiveConcentratedLp<S> {
    fn name(&self) -> &'static str {
        "Passive Concentrated LP"
    }

    fn predict(&mut self, obs: &dyn PoolObservation) -> Result<Vec<PolicyAction>> {
        self.advance(obs).inspect_err(|e| {
            warn!(step = self.driver.step, stage = %self.stage(), error = %e, "Step failed");
        })
    }

    fn state(&self) -> &LifecycleState {
        &self.driver.state
    }

    fn stats(&self) -> &AccumulatedStats {
        &self.driver.stats
    }

    fn events(&self) -> &EventLog {
        &self.driver.events
    }

    fn last_signals(&self) -> &[Signal] {
        &self.driver.last_signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::error::PolicyError;
    use crate::observation::ObservationError;
    use crate::snapshot::{PoolSnapshot, PoolState};
    use clmm_lp_domain::TokenPair;
    use rust_decimal_macros::dec;

    fn observe(wallet: (Decimal, Decimal)) -> PoolSnapshot {
        PoolSnapshot::new(0)
            .with_pool(PoolState::new(
                "A/B",
                TokenPair::new("A", "B"),
                10,
                TickRange::new(0, 10).unwrap(),
                dec!(1),
            ))
            .with_balance("A", wallet.0)
            .with_balance("B", wallet.1)
            .with_decimals("A", 18)
            .with_decimals("B", 18)
    }

    fn passive() -> PassiveConcentratedLp {
        PassiveConcentratedLp::without_telemetry(PassiveLpConfig::default()).unwrap()
    }

    #[test]
    fn test_trades_once_then_provides_once() {
        let mut policy = passive();

        let actions = policy.predict(&observe((dec!(1000), dec!(0)))).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind(), ActionKind::TradeToTickRange);

        let actions = policy.predict(&observe((dec!(500), dec!(500)))).unwrap();
        match &actions[..] {
            [PolicyAction::ProvideLiquidity {
                tick_range,
                amount0,
                ..
            }] => {
                // ln(0.95) / ln(1.0001) = -512.9, ln(1.05) / ln(1.0001) = 487.9
                assert_eq!(*tick_range, TickRange::new(-520, 480).unwrap());
                assert_eq!(*amount0, dec!(500));
            }
            other => panic!("expected a single provide action, got {other:?}"),
        }
        assert_eq!(policy.stage(), LifecycleStage::Invested);
        assert_eq!(policy.stats().swap_count(), 1);

        for _ in 0..5 {
            assert!(policy.predict(&observe((dec!(0), dec!(0)))).unwrap().is_empty());
        }
        assert_eq!(policy.stage(), LifecycleStage::Invested);
        assert_eq!(policy.events().investment_count(), 1);
    }

    #[test]
    fn test_band_too_narrow_for_spacing() {
        let config = PassiveLpConfig::new(dec!(1.0001), dec!(1.0002));
        let mut policy = PassiveConcentratedLp::without_telemetry(config).unwrap();
        let result = policy.predict(&observe((dec!(1), dec!(1))));
        assert!(matches!(result, Err(PolicyError::Domain(_))));
        assert_eq!(policy.stage(), LifecycleStage::Idle);
    }

    #[test]
    fn test_band_overflow_is_an_error() {
        let config = PassiveLpConfig::new(dec!(0.5), dec!(2));
        let mut policy = PassiveConcentratedLp::without_telemetry(config).unwrap();
        let mut obs = observe((dec!(1), dec!(1)));
        obs.pools[0].price = Decimal::MAX;

        assert_eq!(
            policy.predict(&obs),
            Err(PolicyError::Domain(DomainError::Overflow("price band")))
        );
        assert_eq!(policy.stage(), LifecycleStage::Idle);
    }

    #[test]
    fn test_requires_token_decimals() {
        let mut policy = passive();
        let mut obs = observe((dec!(1), dec!(1)));
        obs.decimals.clear();
        assert_eq!(
            policy.predict(&obs),
            Err(PolicyError::Observation(ObservationError::MissingDecimals(
                "A".to_string()
            )))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PassiveLpConfig::new(dec!(1.1), dec!(0.9));
        assert!(matches!(
            PassiveConcentratedLp::without_telemetry(config),
            Err(PolicyError::Config(_))
        ));
    }
}
