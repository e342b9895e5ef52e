//! Core domain types for concentrated-liquidity policies.
//!
//! - Tick ranges and tick/price conversion
//! - Positions and the metadata a pool reports about them
//! - Wealth and impermanent-loss metrics

/// Domain errors.
pub mod error;
/// Wealth and impermanent-loss metrics.
pub mod metrics;
/// Pool identifiers.
pub mod pool;
/// Liquidity positions.
pub mod position;
/// Ticks and tick ranges.
pub mod tick;
/// Pool token pairs.
pub mod token;

pub use error::{DomainError, Result};
pub use metrics::Holdings;
pub use pool::PoolId;
pub use position::{Position, PositionId, PositionInfo};
pub use tick::TickRange;
pub use token::TokenPair;
