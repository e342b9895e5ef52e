//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_lp_policies::prelude::*;
//! ```

// Actions
pub use crate::action::{ActionKind, PolicyAction};

// Configuration
pub use crate::config::{ActiveLpConfig, PassiveLpConfig};

// Errors
pub use crate::error::{PolicyError, Result};

// Events
pub use crate::events::{EventLog, TransitionEvent};

// Observation
pub use crate::observation::{ObservationError, PoolObservation};

// Policies
pub use crate::policy::Policy;
pub use crate::strategies::{ActiveConcentratedLp, PassiveConcentratedLp};

// Range and rebalancing
pub use crate::range::compute_target_range;
pub use crate::rebalance::{TradeDelta, compute_rebalance_trade, target_holdings};

// Signals and telemetry
pub use crate::signals::{Signal, SignalReporter};
pub use crate::telemetry::{MemorySink, NullSink, SignalSink, TracingSink};

// Snapshots
pub use crate::snapshot::{PoolSnapshot, PoolState};

// State
pub use crate::state::{AccumulatedStats, LifecycleStage, LifecycleState};
