use super::Holdings;
use super::wealth::wealth_in_token1;
use crate::error::{DomainError, Result};
use rust_decimal::Decimal;

/// Value of a hold-only baseline at the current price, in token1.
pub fn hodl_value(baseline: Holdings, price: Decimal) -> Result<Decimal> {
    wealth_in_token1(baseline, price)
}

/// Compares what a liquidity strategy holds now against holding the baseline
/// tokens untouched.
///
/// # Arguments
///
/// * `current` - Everything the strategy holds now: wallet, position and fees
/// * `baseline` - Token quantities held when the strategy first invested
/// * `price` - Current price of token0 in token1
///
/// # Returns
///
/// The difference in token1; negative when holding would have been better.
pub fn impermanent_loss(current: Holdings, baseline: Holdings, price: Decimal) -> Result<Decimal> {
    wealth_in_token1(current, price)?
        .checked_sub(hodl_value(baseline, price)?)
        .ok_or(DomainError::Overflow("impermanent loss"))
}
