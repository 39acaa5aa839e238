//! Server-configured key quota

use serde::{Deserialize, Serialize};

/// Quota configuration fetched once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaConfig {
    /// Maximum number of simultaneously live keys
    pub max_keys: u32,
    /// Lifetime of a newly issued key, in days
    pub expiration_days: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_keys: 2,
            expiration_days: 15,
        }
    }
}

impl QuotaConfig {
    pub fn new(max_keys: u32, expiration_days: u32) -> Self {
        Self {
            max_keys,
            expiration_days,
        }
    }

    /// Check whether one more key fits next to `live` existing keys
    pub fn allows_another(&self, live: usize) -> bool {
        live < self.max_keys as usize
    }

    /// Keys that can still be generated
    pub fn remaining(&self, live: usize) -> usize {
        (self.max_keys as usize).saturating_sub(live)
    }
}
