//! Target range calculation.
//!
//! Padding the active range outward, rather than matching it exactly, absorbs
//! small price oscillations without forcing a rebalance every step.

use clmm_lp_domain::{DomainError, Result, TickRange};

/// Computes the range to provide liquidity into.
///
/// Returns the active range padded by `width_in_spacings * tick_spacing`
/// ticks on each side. With `width_in_spacings == 0` the active range itself
/// is returned.
///
/// # Arguments
///
/// * `active` - The pool's currently active tick range
/// * `tick_spacing` - Pool tick spacing, strictly positive
/// * `width_in_spacings` - Padding per side, in tick spacings
///
/// # Errors
///
/// Returns [`DomainError::InvalidTickSpacing`] unless `tick_spacing > 0`.
pub fn compute_target_range(
    active: TickRange,
    tick_spacing: i32,
    width_in_spacings: u32,
) -> Result<TickRange> {
    if tick_spacing <= 0 {
        return Err(DomainError::InvalidTickSpacing(tick_spacing));
    }
    let pad = width_in_spacings.saturating_mul(tick_spacing.unsigned_abs());
    Ok(active.padded(pad))
}
