//! Liquidity provision policies.
//!
//! Both policies walk the same [`LifecycleState`] machine; the shared
//! bookkeeping of a step (event, signals, commit) lives in [`LifecycleDriver`].

mod active_lp;
mod passive_lp;

pub use active_lp::ActiveConcentratedLp;
pub use passive_lp::PassiveConcentratedLp;

use crate::action::PolicyAction;
use crate::error::{PolicyError, Result};
use crate::events::{EventLog, TransitionEvent};
use crate::observation::PoolObservation;
use crate::signals::{Signal, SignalReporter};
use crate::state::{AccumulatedStats, LifecycleState};
use crate::telemetry::SignalSink;
use clmm_lp_domain::{DomainError, PoolId};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Outcome of one transition, not yet applied to the policy.
#[derive(Debug)]
struct Transition {
    next: LifecycleState,
    stats: AccumulatedStats,
    action: Option<PolicyAction>,
}

impl Transition {
    fn stay(state: LifecycleState, stats: &AccumulatedStats) -> Self {
        Self {
            next: state,
            stats: stats.clone(),
            action: None,
        }
    }

    fn to(next: LifecycleState, stats: AccumulatedStats, action: PolicyAction) -> Self {
        Self {
            next,
            stats,
            action: Some(action),
        }
    }
}

/// Wallet wealth moved by a rebalancing trade.
fn wealth_change(before: Decimal, after: Decimal) -> Result<Decimal> {
    after
        .checked_sub(before)
        .ok_or(PolicyError::Domain(DomainError::Overflow("wealth change")))
}

/// Lifecycle state, counters and telemetry of a policy instance.
#[derive(Debug)]
struct LifecycleDriver<S> {
    reporter: SignalReporter,
    sink: S,
    state: LifecycleState,
    stats: AccumulatedStats,
    events: EventLog,
    step: u64,
    last_signals: Vec<Signal>,
}

impl<S: SignalSink> LifecycleDriver<S> {
    fn new(reporter: SignalReporter, sink: S) -> Self {
        Self {
            reporter,
            sink,
            state: LifecycleState::Idle,
            stats: AccumulatedStats::new(),
            events: EventLog::new(),
            step: 0,
            last_signals: Vec::new(),
        }
    }

    /// Applies `transition`: signals are computed first, so a failure leaves
    /// the driver untouched.
    fn commit(
        &mut self,
        pool: &PoolId,
        obs: &dyn PoolObservation,
        transition: Transition,
    ) -> Result<Vec<PolicyAction>> {
        let signals = self
            .reporter
            .compute_signals(&transition.next, &transition.stats, obs, pool)?;

        let from = self.state.stage();
        let to = transition.next.stage();
        let mut event = TransitionEvent::new(self.step, from, to);
        match &transition.action {
            Some(action) => {
                event = event.with_action(action.kind());
                info!(
                    step = self.step,
                    from = %from,
                    to = %to,
                    action = %action,
                    "Lifecycle transition"
                );
            }
            None => debug!(step = self.step, stage = %to, "No action"),
        }
        self.events.record(event);

        for signal in &signals {
            self.sink.publish(self.step, signal);
        }

        self.state = transition.next;
        self.stats = transition.stats;
        self.last_signals = signals;
        self.step += 1;

        Ok(transition.action.into_iter().collect())
    }
}
