//! Plain-data pool snapshots.
//!
//! A [`PoolSnapshot`] captures everything a policy may read at one step. It
//! implements [`PoolObservation`] and is the record format of replay files.

use crate::observation::{ObservationError, PoolObservation};
use clmm_lp_domain::{PoolId, PositionId, PositionInfo, TickRange, TokenPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of one pool at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    /// Pool identifier.
    pub id: PoolId,
    /// Pool tokens in pool order.
    pub tokens: TokenPair,
    /// Tick spacing of the fee tier.
    pub tick_spacing: i32,
    /// Tick interval currently earning fees.
    pub active_tick_range: TickRange,
    /// Price of token0 in token1.
    pub price: Decimal,
}

impl PoolState {
    /// Creates a pool state.
    #[must_use]
    pub fn new(
        id: impl Into<PoolId>,
        tokens: TokenPair,
        tick_spacing: i32,
        active_tick_range: TickRange,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            tokens,
            tick_spacing,
            active_tick_range,
            price,
        }
    }
}

/// Complete observation at one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Step number.
    #[serde(default)]
    pub step: u64,
    /// Pools, in environment order.
    pub pools: Vec<PoolState>,
    /// Wallet balances by token symbol.
    #[serde(default)]
    pub wallet: BTreeMap<String, Decimal>,
    /// Owned positions, oldest first.
    #[serde(default)]
    pub positions: Vec<PositionInfo>,
    /// Token decimals by symbol.
    #[serde(default)]
    pub decimals: BTreeMap<String, u32>,
}

impl PoolSnapshot {
    /// Creates an empty snapshot for `step`.
    #[must_use]
    pub fn new(step: u64) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    /// Adds a pool.
    #[must_use]
    pub fn with_pool(mut self, pool: PoolState) -> Self {
        self.pools.push(pool);
        self
    }

    /// Sets a wallet balance.
    #[must_use]
    pub fn with_balance(mut self, token: impl Into<String>, amount: Decimal) -> Self {
        self.wallet.insert(token.into(), amount);
        self
    }

    /// Adds an owned position.
    #[must_use]
    pub fn with_position(mut self, position: PositionInfo) -> Self {
        self.positions.push(position);
        self
    }

    /// Sets the decimals of a token.
    #[must_use]
    pub fn with_decimals(mut self, token: impl Into<String>, decimals: u32) -> Self {
        self.decimals.insert(token.into(), decimals);
        self
    }

    fn pool_state(&self, pool: &PoolId) -> Result<&PoolState, ObservationError> {
        self.pools
            .iter()
            .find(|p| &p.id == pool)
            .ok_or_else(|| ObservationError::UnknownPool(pool.clone()))
    }
}

impl PoolObservation for PoolSnapshot {
    fn pools(&self) -> Vec<PoolId> {
        self.pools.iter().map(|p| p.id.clone()).collect()
    }

    fn pool_tokens(&self, pool: &PoolId) -> Result<TokenPair, ObservationError> {
        Ok(self.pool_state(pool)?.tokens.clone())
    }

    fn active_tick_range(&self, pool: &PoolId) -> Result<TickRange, ObservationError> {
        Ok(self.pool_state(pool)?.active_tick_range)
    }

    fn tick_spacing(&self, pool: &PoolId) -> Result<i32, ObservationError> {
        Ok(self.pool_state(pool)?.tick_spacing)
    }

    fn price(&self, token: &str, unit: &str, pool: &PoolId) -> Result<Decimal, ObservationError> {
        let state = self.pool_state(pool)?;
        for symbol in [token, unit] {
            if !state.tokens.contains(symbol) {
                return Err(ObservationError::UnknownToken {
                    token: symbol.to_string(),
                    pool: pool.clone(),
                });
            }
        }
        if state.price <= Decimal::ZERO {
            return Err(ObservationError::NonPositivePrice(pool.clone()));
        }

        if token == unit {
            Ok(Decimal::ONE)
        } else if token == state.tokens.token0 {
            Ok(state.price)
        } else {
            Ok(Decimal::ONE / state.price)
        }
    }

    fn token_decimals(&self, token: &str) -> Result<u32, ObservationError> {
        self.decimals
            .get(token)
            .copied()
            .ok_or_else(|| ObservationError::MissingDecimals(token.to_string()))
    }

    fn wallet_balance(&self, token: &str) -> Decimal {
        self.wallet.get(token).copied().unwrap_or_default()
    }

    fn owned_positions(&self) -> Vec<PositionId> {
        self.positions.iter().map(|p| p.id).collect()
    }

    fn position(&self, id: PositionId) -> Option<PositionInfo> {
        self.positions.iter().find(|p| p.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot::new(3)
            .with_pool(PoolState::new(
                "USDC/WETH-0.05",
                TokenPair::new("USDC", "WETH"),
                10,
                TickRange::new(100, 110).unwrap(),
                dec!(0.0005),
            ))
            .with_balance("USDC", dec!(1000))
    }

    #[test]
    fn test_price_quotes_both_directions() {
        let obs = snapshot();
        let pool = PoolId::from("USDC/WETH-0.05");

        assert_eq!(obs.price("USDC", "WETH", &pool).unwrap(), dec!(0.0005));
        assert_eq!(obs.price("WETH", "USDC", &pool).unwrap(), dec!(2000));
        assert_eq!(obs.price("WETH", "WETH", &pool).unwrap(), Decimal::ONE);
        assert!(matches!(
            obs.price("PEPE", "USDC", &pool),
            Err(ObservationError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_unknown_pool() {
        let obs = snapshot();
        let missing = PoolId::from("DAI/USDC-0.01");
        assert_eq!(
            obs.tick_spacing(&missing),
            Err(ObservationError::UnknownPool(missing.clone()))
        );
    }

    #[test]
    fn test_wallet_and_positions() {
        let pool = PoolId::from("USDC/WETH-0.05");
        let obs = snapshot()
            .with_position(PositionInfo {
                id: PositionId(7),
                pool: pool.clone(),
                range: TickRange::new(80, 220).unwrap(),
                liquidity: 1_000,
                amount0: dec!(1),
                amount1: dec!(2),
                fees0: Decimal::ZERO,
                fees1: Decimal::ZERO,
            })
            .with_position(PositionInfo {
                id: PositionId(9),
                pool,
                range: TickRange::new(90, 210).unwrap(),
                liquidity: 0,
                amount0: Decimal::ZERO,
                amount1: Decimal::ZERO,
                fees0: Decimal::ZERO,
                fees1: Decimal::ZERO,
            });

        assert_eq!(obs.wallet_balance("USDC"), dec!(1000));
        assert_eq!(obs.wallet_balance("WETH"), Decimal::ZERO);
        assert_eq!(obs.owned_positions(), vec![PositionId(7), PositionId(9)]);
        assert_eq!(obs.latest_position(), Some(PositionId(9)));
        assert!(obs.position(PositionId(9)).unwrap().is_empty());
        assert!(obs.position(PositionId(1)).is_none());
    }

    #[test]
    fn test_deserialize_replay_record() {
        let json = r#"{
            "step": 4,
            "pools": [{
                "id": "USDC/WETH-0.05",
                "tokens": {"token0": "USDC", "token1": "WETH"},
                "tick_spacing": 10,
                "active_tick_range": [100, 110],
                "price": "0.0005"
            }],
            "wallet": {"USDC": "1000", "WETH": "0.5"},
            "positions": [{
                "id": 12,
                "pool": "USDC/WETH-0.05",
                "range": [80, 220],
                "liquidity": 123456
            }]
        }"#;

        let obs: PoolSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(obs.step, 4);
        assert_eq!(obs.wallet_balance("WETH"), dec!(0.5));
        let position = obs.position(PositionId(12)).unwrap();
        assert_eq!(position.liquidity, 123_456);
        assert_eq!(position.fees0, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let json = r#"{
            "pools": [{
                "id": "p",
                "tokens": {"token0": "A", "token1": "B"},
                "tick_spacing": 10,
                "active_tick_range": [110, 100],
                "price": "1"
            }]
        }"#;
        assert!(serde_json::from_str::<PoolSnapshot>(json).is_err());
    }
}
