use std::collections::HashMap;

use uuid::Uuid;

use openmemory_core::memory::ScoredVector;

/// Unions per-sector ANN candidate sets keyed by memory id (spec.md §4.3
/// step 3), keeping the best score seen for a memory across sectors.
pub fn union_best_sim(per_sector: Vec<Vec<ScoredVector>>) -> HashMap<Uuid, f64> {
    let mut best: HashMap<Uuid, f64> = HashMap::new();
    for hits in per_sector {
        for hit in hits {
            best.entry(hit.memory_id).and_modify(|s| *s = s.max(hit.score)).or_insert(hit.score);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Sector;

    #[test]
    fn keeps_best_score_across_sectors() {
        let id = Uuid::new_v4();
        let per_sector = vec![
            vec![ScoredVector { memory_id: id, sector: Sector::Episodic, score: 0.4 }],
            vec![ScoredVector { memory_id: id, sector: Sector::Semantic, score: 0.9 }],
        ];
        let result = union_best_sim(per_sector);
        assert_eq!(result[&id], 0.9);
    }
}
