use serde::{Deserialize, Serialize};

use super::defaults;

/// Maintenance task scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Consecutive failures a named task may accrue before it is disabled.
    pub max_consecutive_failures: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_consecutive_failures: defaults::DEFAULT_MAX_CONSECUTIVE_FAILURES }
    }
}
