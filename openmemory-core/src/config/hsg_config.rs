use serde::{Deserialize, Serialize};

use super::defaults;

/// Tunables for the `add` dedup probe (spec.md §4.3 step 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HsgConfig {
    /// Maximum Hamming distance between simhash fingerprints still
    /// considered the same memory.
    pub dedup_hamming_threshold: u32,
    /// Salience boost applied when `add` reinforces an existing duplicate
    /// instead of creating a new row.
    pub dedup_salience_boost: f64,
    /// `k'` multiplier applied to `limit` when pulling ANN candidates per
    /// sector (spec.md §4.3 step 2: `k' = max(limit*4, 20)`).
    pub ann_candidate_multiplier: usize,
    /// Floor on the ANN candidate pool size regardless of `limit`.
    pub ann_candidate_floor: usize,
}

impl Default for HsgConfig {
    fn default() -> Self {
        Self {
            dedup_hamming_threshold: defaults::DEFAULT_SIMHASH_HAMMING_THRESHOLD,
            dedup_salience_boost: defaults::DEFAULT_DEDUP_SALIENCE_BOOST,
            ann_candidate_multiplier: 4,
            ann_candidate_floor: 20,
        }
    }
}
