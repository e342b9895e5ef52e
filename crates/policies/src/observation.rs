//! The read-only view of pool and account state a policy consumes each step.
//!
//! [`PoolObservation`] is deliberately narrow: it exposes only the accessors
//! the policies in this crate need, so they can run against any environment
//! able to answer them.

use clmm_lp_domain::{PoolId, PositionId, PositionInfo, TickRange, TokenPair};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when an observation cannot answer a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    /// The pool is not part of the observation.
    #[error("unknown pool {0}")]
    UnknownPool(PoolId),

    /// The token is not quoted by the pool.
    #[error("token {token} is not traded in pool {pool}")]
    UnknownToken {
        /// Requested token.
        token: String,
        /// Pool that was asked.
        pool: PoolId,
    },

    /// The pool reports a zero or negative price.
    #[error("pool {0} reports a non-positive price")]
    NonPositivePrice(PoolId),

    /// No decimals are known for the token.
    #[error("no decimals known for token {0}")]
    MissingDecimals(String),
}

/// Capability interface over the environment's state at one simulation step.
pub trait PoolObservation {
    /// Pools visible to the policy, in environment order.
    fn pools(&self) -> Vec<PoolId>;

    /// The `(token0, token1)` pair of a pool.
    fn pool_tokens(&self, pool: &PoolId) -> Result<TokenPair, ObservationError>;

    /// The tick interval currently earning fees.
    fn active_tick_range(&self, pool: &PoolId) -> Result<TickRange, ObservationError>;

    /// Tick spacing of the pool fee tier.
    fn tick_spacing(&self, pool: &PoolId) -> Result<i32, ObservationError>;

    /// Amount of `unit` paid for one `token` in `pool`.
    fn price(&self, token: &str, unit: &str, pool: &PoolId) -> Result<Decimal, ObservationError>;

    /// On-chain decimals of a token.
    fn token_decimals(&self, token: &str) -> Result<u32, ObservationError>;

    /// Wallet balance of `token`; zero when the account holds none.
    fn wallet_balance(&self, token: &str) -> Decimal;

    /// Ownership tokens of the account's liquidity positions, oldest first.
    fn owned_positions(&self) -> Vec<PositionId>;

    /// Metadata of a position, if the environment knows it.
    fn position(&self, id: PositionId) -> Option<PositionInfo>;

    /// The most recently minted position owned by the account.
    fn latest_position(&self) -> Option<PositionId> {
        self.owned_positions().last().copied()
    }
}
