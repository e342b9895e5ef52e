//! Step-driven liquidity provision policies for concentrated-liquidity pools.
//!
//! This crate provides:
//! - A narrow observation interface over pool and account state
//! - Target range calculation and 50/50 rebalancing
//! - The active LP lifecycle state machine and a passive LP policy
//! - Signal reporting through injected telemetry sinks
//! - Transition event logs

/// Prelude module for convenient imports.
pub mod prelude;

/// Actions emitted by policies.
pub mod action;
/// Policy configuration.
pub mod config;
/// Error types.
pub mod error;
/// Lifecycle transition events.
pub mod events;
/// Observation interface.
pub mod observation;
/// The policy trait.
pub mod policy;
/// Target range calculation.
pub mod range;
/// Rebalancing trades.
pub mod rebalance;
/// Signal derivation.
pub mod signals;
/// Replayable pool snapshots.
pub mod snapshot;
/// Lifecycle state and counters.
pub mod state;
/// Liquidity policies.
pub mod strategies;
/// Telemetry sinks.
pub mod telemetry;

pub use error::{PolicyError, Result};
