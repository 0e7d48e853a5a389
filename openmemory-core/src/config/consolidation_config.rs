use serde::{Deserialize, Serialize};

use super::defaults;

/// Cold-memory clustering and summarization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Minimum cluster size for HDBSCAN.
    pub min_cluster_size: usize,
    /// Cosine similarity threshold for grouping candidates into a cluster.
    pub similarity_threshold: f64,
    /// Minimum age, in days, before a memory is eligible for consolidation.
    pub cold_memory_age_days: u64,
    /// Max characters kept when concatenating cluster essences into a summary.
    pub summary_max_chars: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: defaults::DEFAULT_MIN_CLUSTER_SIZE,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            cold_memory_age_days: defaults::DEFAULT_COLD_MEMORY_AGE_DAYS,
            summary_max_chars: defaults::DEFAULT_SUMMARY_MAX_CHARS,
        }
    }
}
