use serde::{Deserialize, Serialize};

use super::defaults;

/// SQLite connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Number of pooled read-only connections.
    pub read_pool_size: usize,
    /// Hamming distance within which two simhash fingerprints are treated
    /// as near-duplicates.
    pub simhash_hamming_threshold: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            simhash_hamming_threshold: defaults::DEFAULT_SIMHASH_HAMMING_THRESHOLD,
        }
    }
}
