use serde::{Deserialize, Serialize};
use std::fmt;

/// The two tokens of a pool, in pool order.
///
/// Prices quoted by a pool are always token1 per token0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub token0: String,
    pub token1: String,
}

impl TokenPair {
    pub fn new(token0: impl Into<String>, token1: impl Into<String>) -> Self {
        Self {
            token0: token0.into(),
            token1: token1.into(),
        }
    }

    /// Whether `token` is one of the two pool tokens.
    pub fn contains(&self, token: &str) -> bool {
        self.token0 == token || self.token1 == token
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token0, self.token1)
    }
}
