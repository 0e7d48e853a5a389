use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Decay subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Per-sector λ overrides; unset sectors fall back to `Sector::config()`.
    pub lambda_overrides: HashMap<String, f64>,
    /// Salience floor below which a memory becomes eligible for consolidation.
    pub archival_salience_threshold: f64,
    /// Interval between scheduled decay processing runs, in seconds.
    pub processing_interval_secs: u64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            lambda_overrides: HashMap::new(),
            archival_salience_threshold: defaults::DEFAULT_ARCHIVAL_SALIENCE_THRESHOLD,
            processing_interval_secs: defaults::DEFAULT_DECAY_PROCESSING_INTERVAL_SECS,
        }
    }
}
