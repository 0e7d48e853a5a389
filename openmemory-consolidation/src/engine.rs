use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use openmemory_core::config::ConsolidationConfig;
use openmemory_core::memory::Memory;
use openmemory_core::{OpenMemoryError, OpenMemoryResult};

use crate::clustering;
use crate::summarize::summarize_cluster;

/// A cold memory eligible for consolidation, plus the pieces the engine
/// cannot derive itself: a plaintext essence (since `content` is
/// ciphertext) and whether anything still points at it via a waypoint.
#[derive(Debug, Clone)]
pub struct ColdCandidate {
    pub memory: Memory,
    pub essence: String,
    pub has_inbound_waypoint: bool,
}

/// A cluster of cold memories to collapse into one "slow" memory.
#[derive(Debug, Clone)]
pub struct ConsolidationPlan {
    pub summary_content: String,
    pub absorbed_ids: Vec<Uuid>,
    /// The user every absorbed candidate belongs to — groups are formed
    /// per-user (see `plan`), so this is unambiguous.
    pub owner_user_id: String,
}

/// Releases the running guard on drop so a panicking or early-returning
/// `plan()` call can't leave the engine permanently locked.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Clusters cold, waypoint-orphaned memories by embedding similarity
/// within a sector and proposes summarization plans (spec.md §4.4).
/// Storage-agnostic: callers fetch candidates, apply the resulting
/// plans, and rewrite waypoints onto the new summary memory.
pub struct ConsolidationEngine {
    config: ConsolidationConfig,
    is_running: Arc<AtomicBool>,
}

impl ConsolidationEngine {
    pub fn new(config: ConsolidationConfig) -> Self {
        ConsolidationEngine { config, is_running: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    /// Builds consolidation plans from a pool of already-cold candidates.
    /// Candidates with inbound waypoints are excluded outright. Remaining
    /// candidates are grouped by `(primary_sector, userId)` — consolidation
    /// never merges memories across users — then clustered by `mean_vec`
    /// cosine similarity within each group; clusters below
    /// `min_cluster_size` are left as noise and not consolidated this round.
    ///
    /// Errs with `Conflict` if a consolidation run is already in flight —
    /// this is meant to run under a named distributed lock one layer up,
    /// but guards against concurrent callers within the same process too.
    pub fn plan(&self, candidates: Vec<ColdCandidate>) -> OpenMemoryResult<Vec<ConsolidationPlan>> {
        if self.is_running.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(OpenMemoryError::conflict("consolidation is already running"));
        }
        let _guard = RunGuard(Arc::clone(&self.is_running));

        let eligible: Vec<ColdCandidate> = candidates.into_iter().filter(|c| !c.has_inbound_waypoint).collect();

        let mut by_group: std::collections::HashMap<_, Vec<ColdCandidate>> = std::collections::HashMap::new();
        for candidate in eligible {
            by_group.entry((candidate.memory.primary_sector, candidate.memory.user_id.clone())).or_default().push(candidate);
        }

        let mut plans = Vec::new();
        for group in by_group.into_values() {
            plans.extend(self.plan_sector_group(group));
        }
        Ok(plans)
    }

    fn plan_sector_group(&self, group: Vec<ColdCandidate>) -> Vec<ConsolidationPlan> {
        let vectors: Vec<Vec<f32>> = group.iter().map(|c| c.memory.mean_vec.clone().unwrap_or_default()).collect();
        if vectors.iter().any(|v| v.is_empty()) {
            return Vec::new();
        }

        let result = clustering::cluster_by_embedding(&vectors, self.config.min_cluster_size);

        result
            .clusters
            .into_iter()
            .filter_map(|indices| {
                if !cluster_passes_similarity(&indices, &vectors, self.config.similarity_threshold) {
                    return None;
                }
                let essences: Vec<String> = indices.iter().map(|&i| group[i].essence.clone()).collect();
                let absorbed_ids: Vec<Uuid> = indices.iter().map(|&i| group[i].memory.id).collect();
                let owner_user_id = group[indices[0]].memory.user_id.clone();
                let summary_content = summarize_cluster(&essences, self.config.summary_max_chars);
                Some(ConsolidationPlan { summary_content, absorbed_ids, owner_user_id })
            })
            .collect()
    }
}

fn cluster_passes_similarity(indices: &[usize], vectors: &[Vec<f32>], threshold: f64) -> bool {
    if indices.len() < 2 {
        return false;
    }
    for i in 0..indices.len() {
        for j in (i + 1)..indices.len() {
            let sim = crate::algorithms::similarity::cosine_similarity(&vectors[indices[i]], &vectors[indices[j]]);
            if sim < threshold {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Sector;

    fn candidate(sector: Sector, vec: Vec<f32>, essence: &str) -> ColdCandidate {
        let mut memory = Memory::new("user-1", "ciphertext", sector);
        memory.mean_vec = Some(vec);
        ColdCandidate { memory, essence: essence.to_string(), has_inbound_waypoint: false }
    }

    #[test]
    fn candidates_with_inbound_waypoints_are_excluded() {
        let engine = ConsolidationEngine::new(ConsolidationConfig { min_cluster_size: 2, ..Default::default() });
        let mut c = candidate(Sector::Semantic, vec![1.0, 1.0, 1.0], "alpha fact");
        c.has_inbound_waypoint = true;
        let plans = engine.plan(vec![c]).unwrap();
        assert!(plans.is_empty());
    }

    #[test]
    fn tight_cluster_produces_a_plan() {
        let config = ConsolidationConfig { min_cluster_size: 2, similarity_threshold: 0.9, ..Default::default() };
        let engine = ConsolidationEngine::new(config);
        let candidates = vec![
            candidate(Sector::Semantic, vec![1.0, 1.0, 1.0], "the sky is blue"),
            candidate(Sector::Semantic, vec![1.0, 1.0, 1.01], "the sky looks blue"),
        ];
        let plans = engine.plan(candidates).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].absorbed_ids.len(), 2);
        assert!(!plans[0].summary_content.is_empty());
    }

    #[test]
    fn different_sectors_never_cluster_together() {
        let config = ConsolidationConfig { min_cluster_size: 2, ..Default::default() };
        let engine = ConsolidationEngine::new(config);
        let candidates = vec![
            candidate(Sector::Semantic, vec![1.0, 1.0, 1.0], "fact one"),
            candidate(Sector::Episodic, vec![1.0, 1.0, 1.0], "event one"),
        ];
        let plans = engine.plan(candidates).unwrap();
        assert!(plans.is_empty());
    }

    #[test]
    fn concurrent_run_is_rejected() {
        let engine = ConsolidationEngine::new(ConsolidationConfig::default());
        engine.is_running.store(true, Ordering::Release);
        let err = engine.plan(vec![]).unwrap_err();
        assert!(matches!(err, OpenMemoryError::Conflict { .. }));
    }
}
