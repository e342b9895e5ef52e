//! Policy configuration.
//!
//! Both configs deserialize from JSON with every field optional; missing
//! fields take their defaults.

use crate::error::{PolicyError, Result};
use crate::observation::PoolObservation;
use clmm_lp_domain::PoolId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration of [`ActiveConcentratedLp`](crate::strategies::ActiveConcentratedLp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActiveLpConfig {
    /// Pool to provide into; the first observed pool when unset.
    pub pool: Option<PoolId>,
    /// Padding of the target range around the active range, in tick spacings.
    pub lp_width: u32,
    /// Whether to publish the impermanent-loss signal.
    pub report_impermanent_loss: bool,
}

impl Default for ActiveLpConfig {
    fn default() -> Self {
        Self {
            pool: None,
            lp_width: 2,
            report_impermanent_loss: false,
        }
    }
}

impl ActiveLpConfig {
    /// Creates a config with the given range width and defaults otherwise.
    #[must_use]
    pub fn new(lp_width: u32) -> Self {
        Self {
            lp_width,
            ..Self::default()
        }
    }

    /// Sets the pool to provide into.
    #[must_use]
    pub fn with_pool(mut self, pool: impl Into<PoolId>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    /// Sets the range width.
    #[must_use]
    pub fn with_lp_width(mut self, lp_width: u32) -> Self {
        self.lp_width = lp_width;
        self
    }

    /// Enables or disables the impermanent-loss signal.
    #[must_use]
    pub fn with_impermanent_loss(mut self, enabled: bool) -> Self {
        self.report_impermanent_loss = enabled;
        self
    }

    /// Checks the config for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`] for an empty pool id.
    pub fn validate(&self) -> Result<()> {
        validate_pool(self.pool.as_ref())
    }
}

/// Configuration of [`PassiveConcentratedLp`](crate::strategies::PassiveConcentratedLp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassiveLpConfig {
    /// Pool to provide into; the first observed pool when unset.
    pub pool: Option<PoolId>,
    /// Lower range bound as a multiple of the spot price (e.g. 0.95).
    pub lower_price_bound: Decimal,
    /// Upper range bound as a multiple of the spot price (e.g. 1.05).
    pub upper_price_bound: Decimal,
}

impl Default for PassiveLpConfig {
    fn default() -> Self {
        Self {
            pool: None,
            lower_price_bound: Decimal::new(95, 2),
            upper_price_bound: Decimal::new(105, 2),
        }
    }
}

impl PassiveLpConfig {
    /// Creates a config with the given price bounds.
    #[must_use]
    pub fn new(lower_price_bound: Decimal, upper_price_bound: Decimal) -> Self {
        Self {
            pool: None,
            lower_price_bound,
            upper_price_bound,
        }
    }

    /// Sets the pool to provide into.
    #[must_use]
    pub fn with_pool(mut self, pool: impl Into<PoolId>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    /// Sets the lower price bound.
    #[must_use]
    pub fn with_lower_price_bound(mut self, bound: Decimal) -> Self {
        self.lower_price_bound = bound;
        self
    }

    /// Sets the upper price bound.
    #[must_use]
    pub fn with_upper_price_bound(mut self, bound: Decimal) -> Self {
        self.upper_price_bound = bound;
        self
    }

    /// Checks the config for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`] for an empty pool id, a non-positive
    /// lower bound or bounds that are not strictly increasing.
    pub fn validate(&self) -> Result<()> {
        validate_pool(self.pool.as_ref())?;
        if self.lower_price_bound <= Decimal::ZERO {
            return Err(PolicyError::Config(format!(
                "lower price bound must be positive, got {}",
                self.lower_price_bound
            )));
        }
        if self.lower_price_bound >= self.upper_price_bound {
            return Err(PolicyError::Config(format!(
                "lower price bound {} must be below upper bound {}",
                self.lower_price_bound, self.upper_price_bound
            )));
        }
        Ok(())
    }
}

fn validate_pool(pool: Option<&PoolId>) -> Result<()> {
    match pool {
        Some(id) if id.as_str().trim().is_empty() => {
            Err(PolicyError::Config("pool id must not be empty".to_string()))
        }
        _ => Ok(()),
    }
}

/// Resolves the pool a policy operates on: the configured one, or the first
/// pool of the observation.
pub(crate) fn resolve_pool(
    configured: Option<&PoolId>,
    obs: &dyn PoolObservation,
) -> Result<PoolId> {
    match configured {
        Some(pool) => Ok(pool.clone()),
        None => obs.pools().into_iter().next().ok_or(PolicyError::NoPool),
    }
}
