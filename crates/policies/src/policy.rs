//! The step-driven policy interface.

use crate::action::PolicyAction;
use crate::error::Result;
use crate::events::EventLog;
use crate::observation::PoolObservation;
use crate::signals::Signal;
use crate::state::{AccumulatedStats, LifecycleState};

/// A liquidity policy driven one simulation step at a time.
///
/// The environment calls [`predict`](Policy::predict) exactly once per step
/// and executes the returned actions before the next call.
pub trait Policy {
    /// Returns the name of this policy.
    fn name(&self) -> &'static str;

    /// Advances the policy by one step and returns the actions to execute.
    ///
    /// # Errors
    ///
    /// Returns an error when the observation cannot answer a query or a
    /// domain invariant would be violated. The policy state is left as it
    /// was before the call.
    fn predict(&mut self, obs: &dyn PoolObservation) -> Result<Vec<PolicyAction>>;

    /// Current lifecycle state.
    fn state(&self) -> &LifecycleState;

    /// Running counters.
    fn stats(&self) -> &AccumulatedStats;

    /// Transitions recorded so far.
    fn events(&self) -> &EventLog;

    /// Signals computed by the latest successful step.
    fn last_signals(&self) -> &[Signal];
}
