use chrono::{DateTime, Utc};
use uuid::Uuid;

use openmemory_core::config::RetrievalConfig;

use crate::fusion;
use crate::scorer::{self, Candidate, ScoredMemory};

/// Storage-agnostic hybrid retrieval. Callers own fetching per-sector ANN
/// candidates, waypoint edges, and plaintext search hints from whatever
/// backends they're wired to; this engine only fuses ranks and scores.
pub struct RetrievalEngine {
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(config: RetrievalConfig) -> Self {
        RetrievalEngine { config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Fuses per-sector (or per-path) ranked ID lists into one ordering via
    /// RRF (spec.md §4.3 step 3). Callers use the fused order to decide
    /// which memories to hydrate into `Candidate`s before scoring.
    pub fn fuse_candidate_ids(&self, ranked_lists: &[Vec<Uuid>]) -> Vec<Uuid> {
        fusion::fuse(ranked_lists, self.config.rrf_k).into_iter().map(|(id, _)| id).collect()
    }

    /// Full hybrid ranking: composite score over sim, keyword overlap,
    /// waypoint boost, recency, tag match, salience and BM25, filtered by
    /// `min_score` and truncated to `limit`. `required_tags` must already
    /// have been enforced as a hard filter by the caller.
    pub fn rank(
        &self,
        query: &str,
        required_tags: &[String],
        candidates: Vec<Candidate>,
        waypoint_weight: impl Fn(Uuid, Uuid) -> Option<f64>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<ScoredMemory> {
        let scored = scorer::score_candidates(query, required_tags, candidates, waypoint_weight, &self.config, now);
        scored.into_iter().take(limit).collect()
    }

    /// Keyword-only fallback for when embedding the query fails entirely:
    /// still honors structured filters (applied by the caller before this
    /// is called) and `min_score`, just drops the vector/waypoint/recency/
    /// salience terms (spec.md §4.3, embedding-failure fallback clause).
    pub fn rank_keyword_only(&self, query: &str, candidates: Vec<Candidate>, limit: usize) -> Vec<ScoredMemory> {
        let scored = scorer::score_keyword_fallback(query, candidates, &self.config);
        scored.into_iter().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::{Memory, Sector};

    fn candidate(text: &str, sim: f64) -> Candidate {
        Candidate { memory: Memory::new("user-1", "ciphertext", Sector::Semantic), sim, search_text: text.to_string() }
    }

    #[test]
    fn rank_truncates_to_limit() {
        let engine = RetrievalEngine::new(RetrievalConfig::default());
        let candidates = vec![candidate("fox", 0.9), candidate("fox", 0.8), candidate("fox", 0.1)];
        let ranked = engine.rank("fox", &[], candidates, |_, _| None, Utc::now(), 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn fuse_candidate_ids_unions_lists() {
        let engine = RetrievalEngine::new(RetrievalConfig::default());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let fused = engine.fuse_candidate_ids(&[vec![a], vec![b, a]]);
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0], a);
    }

    #[test]
    fn keyword_only_still_respects_limit() {
        let engine = RetrievalEngine::new(RetrievalConfig::default());
        let candidates = vec![candidate("fox jumps", 0.0), candidate("fox runs", 0.0), candidate("dog sleeps", 0.0)];
        let ranked = engine.rank_keyword_only("fox", candidates, 1);
        assert_eq!(ranked.len(), 1);
    }
}
