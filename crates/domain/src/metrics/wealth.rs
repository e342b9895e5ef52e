use super::Holdings;
use crate::error::{DomainError, Result};
use rust_decimal::Decimal;

/// Values `holdings` in token0, given the pool price (token1 per token0).
/// wealth = amount0 + amount1 / price
pub fn wealth_in_token0(holdings: Holdings, price: Decimal) -> Result<Decimal> {
    if price <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice);
    }
    let converted = holdings
        .amount1
        .checked_div(price)
        .ok_or(DomainError::Overflow("token1 to token0"))?;
    holdings
        .amount0
        .checked_add(converted)
        .ok_or(DomainError::Overflow("wealth in token0"))
}

/// Values `holdings` in token1, given the pool price (token1 per token0).
/// wealth = amount0 * price + amount1
pub fn wealth_in_token1(holdings: Holdings, price: Decimal) -> Result<Decimal> {
    if price <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice);
    }
    holdings
        .amount0
        .checked_mul(price)
        .and_then(|converted| converted.checked_add(holdings.amount1))
        .ok_or(DomainError::Overflow("wealth in token1"))
}
