use serde::{Deserialize, Serialize};

use super::defaults;

/// Distributed lock manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Default lease TTL, in seconds, when a caller doesn't specify one.
    pub default_ttl_secs: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { default_ttl_secs: defaults::DEFAULT_LOCK_TTL_SECS }
    }
}
