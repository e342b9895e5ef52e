//! Domain error types.

use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised when a domain invariant would be violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Lower bound is not strictly below the upper bound.
    #[error("invalid tick range: lower {lower} must be below upper {upper}")]
    InvalidTickRange {
        /// Lower tick.
        lower: i32,
        /// Upper tick.
        upper: i32,
    },

    /// Tick is not a multiple of the pool tick spacing.
    #[error("tick {tick} is not aligned to tick spacing {spacing}")]
    UnalignedTick {
        /// Offending tick.
        tick: i32,
        /// Pool tick spacing.
        spacing: i32,
    },

    /// Tick spacing must be strictly positive.
    #[error("tick spacing must be positive, got {0}")]
    InvalidTickSpacing(i32),

    /// Price must be strictly positive.
    #[error("price must be positive")]
    NonPositivePrice,

    /// A numeric conversion overflowed.
    #[error("numeric overflow: {0}")]
    Overflow(&'static str),
}
