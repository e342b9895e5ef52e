//! Active concentrated liquidity provision.
//!
//! The policy keeps its capital in a range padded around the pool's active
//! tick range. Once the active range leaves the held range entirely, it
//! withdraws, collects, burns and starts over:
//!
//! ```text
//! IDLE -> REBALANCED -> INVESTED -> WITHDRAWN -> COLLECTED -> IDLE
//!                        ^     |
//!                        +-----+ range held
//! ```
//!
//! Every call performs exactly one transition and emits at most one action.
//! Actions are assumed to succeed; the next observation is taken as the
//! ground truth for balances, minted position ids and liquidity.

use super::{LifecycleDriver, Transition, wealth_change};
use crate::action::PolicyAction;
use crate::config::{ActiveLpConfig, resolve_pool};
use crate::error::{PolicyError, Result};
use crate::events::EventLog;
use crate::observation::PoolObservation;
use crate::policy::Policy;
use crate::range::compute_target_range;
use crate::rebalance::compute_rebalance_trade;
use crate::signals::{Signal, SignalReporter};
use crate::state::{AccumulatedStats, LifecycleStage, LifecycleState};
use crate::telemetry::{NullSink, SignalSink};
use clmm_lp_domain::metrics::wealth::wealth_in_token0;
use clmm_lp_domain::{Holdings, PoolId, Position, PositionId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Active liquidity provider that follows the pool price.
#[derive(Debug)]
pub struct ActiveConcentratedLp<S = NullSink> {
    config: ActiveLpConfig,
    driver: LifecycleDriver<S>,
}

impl ActiveConcentratedLp<NullSink> {
    /// Creates a policy that discards its signals.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`] when the config does not validate.
    pub fn without_telemetry(config: ActiveLpConfig) -> Result<Self> {
        Self::new(config, NullSink)
    }
}

impl<S: SignalSink> ActiveConcentratedLp<S> {
    /// Creates a policy in the `Idle` state publishing signals to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`] when the config does not validate.
    pub fn new(config: ActiveLpConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let reporter = SignalReporter::new(config.report_impermanent_loss);
        Ok(Self {
            config,
            driver: LifecycleDriver::new(reporter, sink),
        })
    }

    /// The policy configuration.
    #[must_use]
    pub fn config(&self) -> &ActiveLpConfig {
        &self.config
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> LifecycleStage {
        self.driver.state.stage()
    }

    /// Number of completed steps.
    #[must_use]
    pub fn step(&self) -> u64 {
        self.driver.step
    }

    /// The telemetry sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.driver.sink
    }

    /// Consumes the policy and returns its telemetry sink.
    pub fn into_sink(self) -> S {
        self.driver.sink
    }

    /// Position the current active range asks for.
    fn target_position(&self, obs: &dyn PoolObservation, pool: &PoolId) -> Result<Position> {
        let active = obs.active_tick_range(pool)?;
        let tick_spacing = obs.tick_spacing(pool)?;
        let target = compute_target_range(active, tick_spacing, self.config.lp_width)?;
        Ok(Position::new(target, tick_spacing)?)
    }

    /// Wallet holdings of the pool tokens and the price of token0 in token1.
    fn wallet(&self, obs: &dyn PoolObservation, pool: &PoolId) -> Result<(Holdings, Decimal)> {
        let tokens = obs.pool_tokens(pool)?;
        let price = obs.price(&tokens.token0, &tokens.token1, pool)?;
        let holdings = Holdings::new(
            obs.wallet_balance(&tokens.token0),
            obs.wallet_balance(&tokens.token1),
        );
        Ok((holdings, price))
    }

    fn rebalance(&self, obs: &dyn PoolObservation, pool: &PoolId) -> Result<Transition> {
        let (holdings, price) = self.wallet(obs, pool)?;
        let wealth_before = wealth_in_token0(holdings, price)?;
        let tick_range = self.target_position(obs, pool)?.range();

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

    fn invest(
        &self,
        obs: &dyn PoolObservation,
        pool: &PoolId,
        wealth_before: Decimal,
    ) -> Result<Transition> {
        let (holdings, price) = self.wallet(obs, pool)?;
        let wealth_after = wealth_in_token0(holdings, price)?;
        let position = self.target_position(obs, pool)?;

        let mut stats = self.driver.stats.clone();
        stats.record_swap(wealth_change(wealth_before, wealth_after)?)?;
        stats.capture_baseline(holdings);

        let action = PolicyAction::ProvideLiquidity {
            pool: pool.clone(),
            amount0: holdings.amount0,
            amount1: holdings.amount1,
            tick_range: position.range(),
        };
        Ok(Transition::to(
            LifecycleState::Invested { position },
            stats,
            action,
        ))
    }

    fn withdraw_if_necessary(
        &self,
        obs: &dyn PoolObservation,
        pool: &PoolId,
        position: Position,
    ) -> Result<Transition> {
        let active = obs.active_tick_range(pool)?;
        if position.holds(&active) {
            debug!(
                active = %active,
                held = %position.range(),
                "Active range still overlaps position"
            );
            return Ok(Transition::stay(
                LifecycleState::Invested { position },
                &self.driver.stats,
            ));
        }

        let position_id = obs.latest_position().ok_or(PolicyError::MissingPosition)?;
        let info = obs
            .position(position_id)
            .ok_or(PolicyError::UnknownPosition(position_id))?;
        if info.is_empty() {
            return Err(PolicyError::EmptyPosition(position_id));
        }

        let action = PolicyAction::WithdrawLiquidity {
            position_id,
            liquidity: info.liquidity,
        };
        Ok(Transition::to(
            LifecycleState::Withdrawn {
                position,
                position_id,
            },
            self.driver.stats.clone(),
            action,
        ))
    }

    fn collect(
        &self,
        obs: &dyn PoolObservation,
        pool: &PoolId,
        position: Position,
        position_id: PositionId,
    ) -> Result<Transition> {
        ensure_owned(obs, position_id)?;
        let action = PolicyAction::CollectFees {
            pool: pool.clone(),
            position_id,
        };
        Ok(Transition::to(
            LifecycleState::Collected {
                position,
                position_id,
            },
            self.driver.stats.clone(),
            action,
        ))
    }

    fn burn(&self, obs: &dyn PoolObservation, position_id: PositionId) -> Result<Transition> {
        ensure_owned(obs, position_id)?;
        Ok(Transition::to(
            LifecycleState::Idle,
            self.driver.stats.clone(),
            PolicyAction::BurnPosition { position_id },
        ))
    }

    fn advance(&mut self, obs: &dyn PoolObservation) -> Result<Vec<PolicyAction>> {
        let pool = resolve_pool(self.config.pool.as_ref(), obs)?;
        let transition = match self.driver.state {
            LifecycleState::Idle => self.rebalance(obs, &pool)?,
            LifecycleState::Rebalanced { wealth_before } => {
                self.invest(obs, &pool, wealth_before)?
            }
            LifecycleState::Invested { position } => {
                self.withdraw_if_necessary(obs, &pool, position)?
            }
            LifecycleState::Withdrawn {
                position,
                position_id,
            } => self.collect(obs, &pool, position, position_id)?,
            LifecycleState::Collected { position_id, .. } => self.burn(obs, position_id)?,
        };
        self.driver.commit(&pool, obs, transition)
    }
}

fn ensure_owned(obs: &dyn PoolObservation, position_id: PositionId) -> Result<()> {
    if obs.owned_positions().contains(&position_id) {
        Ok(())
    } else {
        Err(PolicyError::UnknownPosition(position_id))
    }
}

impl<S: SignalSink> Policy for ActiveConcentratedLp<S> {
    fn name(&self) -> &'static str {
        "Active Concentrated LP"
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
