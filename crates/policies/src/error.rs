//! Policy error types.

use crate::observation::ObservationError;
use clmm_lp_domain::{DomainError, PositionId};
use thiserror::Error;

/// Policy result type alias.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors that abort a policy run.
///
/// None of these are recoverable within a run: the pool has already moved on
/// by the time the next step could retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The observation could not answer a query.
    #[error("observation error: {0}")]
    Observation(#[from] ObservationError),

    /// A domain invariant would be violated.
    #[error("invariant violation: {0}")]
    Domain(#[from] DomainError),

    /// The observation exposes no pool to trade in.
    #[error("observation exposes no pool")]
    NoPool,

    /// The account owns no position although the lifecycle holds one.
    #[error("no liquidity position owned while one is held")]
    MissingPosition,

    /// The pool does not know the position id.
    #[error("unknown position {0}")]
    UnknownPosition(PositionId),

    /// Withdrawal requested against a position with no liquidity left.
    #[error("position {0} has no liquidity to withdraw")]
    EmptyPosition(PositionId),

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
