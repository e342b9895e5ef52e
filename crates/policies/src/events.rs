//! Lifecycle transition events recorded by a policy.
//!
//! Every call to a policy records exactly one event, including self-loops, so
//! the log doubles as a step-by-step trace of the run.

use crate::action::ActionKind;
use crate::state::LifecycleStage;
use serde::Serialize;

/// One lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    /// Step the transition happened at.
    pub step: u64,
    /// Stage before the step.
    pub from: LifecycleStage,
    /// Stage after the step.
    pub to: LifecycleStage,
    /// Action emitted by the step, if any.
    pub action: Option<ActionKind>,
}

impl TransitionEvent {
    /// Creates a new transition event.
    #[must_use]
    pub fn new(step: u64, from: LifecycleStage, to: LifecycleStage) -> Self {
        Self {
            step,
            from,
            to,
            action: None,
        }
    }

    /// Sets the emitted action.
    #[must_use]
    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    /// Whether the stage did not change.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Event log for collecting all transitions of a run.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<TransitionEvent>,
}

impl EventLog {
    /// Creates a new empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Records an event.
    pub fn record(&mut self, event: TransitionEvent) {
        self.events.push(event);
    }

    /// Returns all events.
    #[must_use]
    pub fn events(&self) -> &[TransitionEvent] {
        &self.events
    }

    /// Returns the count of transitions that entered `stage`, self-loops
    /// excluded.
    #[must_use]
    pub fn count_entries(&self, stage: LifecycleStage) -> usize {
        self.events
            .iter()
            .filter(|e| e.to == stage && !e.is_self_loop())
            .count()
    }

    /// Returns the number of positions opened.
    #[must_use]
    pub fn investment_count(&self) -> usize {
        self.count_entries(LifecycleStage::Invested)
    }

    /// Returns the number of positions withdrawn.
    #[must_use]
    pub fn withdrawal_count(&self) -> usize {
        self.count_entries(LifecycleStage::Withdrawn)
    }
}
