use crate::error::{DomainError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod impermanent_loss;
pub mod wealth;

/// Quantities of the two pool tokens held by an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    pub amount0: Decimal,
    pub amount1: Decimal,
}

impl Holdings {
    pub fn new(amount0: Decimal, amount1: Decimal) -> Self {
        Self { amount0, amount1 }
    }

    /// Token-wise sum of two holdings.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if either sum leaves the `Decimal` range.
    pub fn checked_add(self, rhs: Holdings) -> Result<Holdings> {
        let amount0 = self.amount0.checked_add(rhs.amount0);
        let amount1 = self.amount1.checked_add(rhs.amount1);
        match (amount0, amount1) {
            (Some(amount0), Some(amount1)) => Ok(Holdings::new(amount0, amount1)),
            _ => Err(DomainError::Overflow("holdings sum")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_holdings_checked_add() {
        let sum = Holdings::new(dec!(1), dec!(2))
            .checked_add(Holdings::new(dec!(0.5), dec!(3)))
            .unwrap();
        assert_eq!(sum, Holdings::new(dec!(1.5), dec!(5)));

        let overflow =
            Holdings::new(Decimal::MAX, dec!(0)).checked_add(Holdings::new(dec!(1), dec!(0)));
        assert_eq!(overflow, Err(DomainError::Overflow("holdings sum")));
    }
}
