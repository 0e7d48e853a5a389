use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use openmemory_core::config::RetrievalConfig;
use openmemory_core::memory::Memory;

use crate::bm25::{self, CorpusStats};
use crate::keyword;
use crate::waypoint_boost;

/// A candidate memory plus the pieces the scorer cannot compute itself:
/// the best-matching-sector cosine similarity (from the vector store) and
/// the plaintext search hint (since `memory.content` is ciphertext).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub memory: Memory,
    pub sim: f64,
    pub search_text: String,
}

/// Per-factor breakdown, kept for observability (spec.md §4.3 step 10).
#[derive(Debug, Clone, Copy)]
pub struct ScoreComponents {
    pub sim: f64,
    pub keyword_overlap: f64,
    pub waypoint_boost: f64,
    pub recency: f64,
    pub tag_match: f64,
    pub salience: f64,
    pub bm25: f64,
}

#[derive(Debug, Clone)]
pub struct ScoredMemory {
    pub memory: Memory,
    pub score: f64,
    pub components: ScoreComponents,
}

/// Scores every candidate with the composite formula and returns them
/// sorted descending, with anything below `config.min_score` already
/// dropped. Does not truncate to a limit — callers do that after
/// recording coactivations over the full scored set.
pub fn score_candidates(
    query: &str,
    required_tags: &[String],
    candidates: Vec<Candidate>,
    waypoint_weight: impl Fn(Uuid, Uuid) -> Option<f64>,
    config: &RetrievalConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredMemory> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let texts: Vec<String> = candidates.iter().map(|c| c.search_text.clone()).collect();
    let stats = CorpusStats::from_documents(&texts);

    let ids: Vec<Uuid> = candidates.iter().map(|c| c.memory.id).collect();
    let boosts: HashMap<Uuid, f64> = waypoint_boost::boost(&ids, waypoint_weight);

    let mut scored: Vec<ScoredMemory> = candidates
        .into_iter()
        .map(|c| {
            let lambda = c.memory.primary_sector.config().decay_lambda;
            let age_days = (now - c.memory.last_seen_at).num_seconds().max(0) as f64 / 86400.0;
            let recency = (-lambda * age_days).exp();

            let components = ScoreComponents {
                sim: c.sim,
                keyword_overlap: keyword::overlap(query, &c.search_text),
                waypoint_boost: boosts.get(&c.memory.id).copied().unwrap_or(0.0),
                recency,
                tag_match: if required_tags.is_empty() { 0.0 } else { 1.0 },
                salience: c.memory.salience.value(),
                bm25: bm25::score(query, &c.search_text, &stats, config.bm25_k1, config.bm25_b),
            };

            let score = config.vector_weight * components.sim
                + config.keyword_weight * components.keyword_overlap
                + config.waypoint_weight * components.waypoint_boost
                + config.recency_weight * components.recency
                + config.tag_weight * components.tag_match
                + config.salience_weight * components.salience
                + components.bm25;

            ScoredMemory { memory: c.memory, score, components }
        })
        .filter(|s| s.score >= config.min_score)
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

/// Keyword-only fallback used when embedding fails entirely: just overlap
/// and BM25, still sorted and min-score filtered the same way (spec.md
/// §4.3, "If embedding fails entirely...").
pub fn score_keyword_fallback(query: &str, candidates: Vec<Candidate>, config: &RetrievalConfig) -> Vec<ScoredMemory> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let texts: Vec<String> = candidates.iter().map(|c| c.search_text.clone()).collect();
    let stats = CorpusStats::from_documents(&texts);

    let mut scored: Vec<ScoredMemory> = candidates
        .into_iter()
        .map(|c| {
            let overlap = keyword::overlap(query, &c.search_text);
            let bm25_score = bm25::score(query, &c.search_text, &stats, config.bm25_k1, config.bm25_b);
            let components = ScoreComponents {
                sim: 0.0,
                keyword_overlap: overlap,
                waypoint_boost: 0.0,
                recency: 0.0,
                tag_match: 0.0,
                salience: 0.0,
                bm25: bm25_score,
            };
            let score = config.keyword_weight * overlap + bm25_score;
            ScoredMemory { memory: c.memory, score, components }
        })
        .filter(|s| s.score >= config.min_score)
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Sector;

    fn candidate(text: &str, sim: f64) -> Candidate {
        Candidate { memory: Memory::new("user-1", "ciphertext", Sector::Semantic), sim, search_text: text.to_string() }
    }

    #[test]
    fn higher_similarity_ranks_first_all_else_equal() {
        let config = RetrievalConfig::default();
        let candidates = vec![candidate("fox", 0.2), candidate("fox", 0.9)];
        let scored = score_candidates("fox", &[], candidates, |_, _| None, &config, Utc::now());
        assert_eq!(scored.len(), 2);
        assert!(scored[0].components.sim >= scored[1].components.sim);
    }

    #[test]
    fn keyword_fallback_ignores_similarity() {
        let config = RetrievalConfig::default();
        let candidates = vec![candidate("the quick brown fox", 0.0), candidate("a lazy dog sleeps", 0.0)];
        let scored = score_keyword_fallback("fox", candidates, &config);
        assert!(!scored.is_empty());
        assert!(scored[0].memory.primary_sector == Sector::Semantic);
        assert!(scored[0].score > 0.0);
    }

    #[test]
    fn empty_candidates_score_to_empty() {
        let config = RetrievalConfig::default();
        assert!(score_candidates("q", &[], vec![], |_, _| None, &config, Utc::now()).is_empty());
    }

    #[test]
    fn below_min_score_is_dropped() {
        let mut config = RetrievalConfig::default();
        config.min_score = 10.0;
        let candidates = vec![candidate("fox", 0.5)];
        let scored = score_candidates("fox", &[], candidates, |_, _| None, &config, Utc::now());
        assert!(scored.is_empty());
    }
}
