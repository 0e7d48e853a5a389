use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights and tunables for the hybrid retrieval scorer (spec.md §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub vector_weight: f64,
    pub keyword_weight: f64,
    pub waypoint_weight: f64,
    pub recency_weight: f64,
    pub tag_weight: f64,
    pub salience_weight: f64,
    /// RRF constant `k` used when fusing vector and keyword candidate ranks.
    pub rrf_k: f64,
    /// Size of the candidate pool pulled from each retrieval path before fusion.
    pub candidate_pool_size: usize,
    pub bm25_k1: f64,
    pub bm25_b: f64,
    /// Candidates scoring below this are dropped before truncation to `limit`.
    pub min_score: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            keyword_weight: defaults::DEFAULT_KEYWORD_WEIGHT,
            waypoint_weight: defaults::DEFAULT_WAYPOINT_WEIGHT,
            recency_weight: defaults::DEFAULT_RECENCY_WEIGHT,
            tag_weight: defaults::DEFAULT_TAG_WEIGHT,
            salience_weight: defaults::DEFAULT_SALIENCE_WEIGHT,
            rrf_k: defaults::DEFAULT_RRF_K,
            candidate_pool_size: defaults::DEFAULT_CANDIDATE_POOL_SIZE,
            bm25_k1: defaults::DEFAULT_BM25_K1,
            bm25_b: defaults::DEFAULT_BM25_B,
            min_score: defaults::DEFAULT_MIN_SCORE,
        }
    }
}
