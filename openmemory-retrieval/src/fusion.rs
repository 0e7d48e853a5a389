use std::collections::HashMap;

use uuid::Uuid;

/// Reciprocal Rank Fusion: `score = sum(1 / (k + rank))` across every
/// ranked list a candidate appears in. Used to union the per-sector ANN
/// candidate sets (spec.md §4.3 step 3) into one fused ranking before
/// composite scoring runs.
pub fn fuse(ranked_lists: &[Vec<Uuid>], k: f64) -> Vec<(Uuid, f64)> {
    let mut scores: HashMap<Uuid, f64> = HashMap::new();

    for list in ranked_lists {
        for (rank, id) in list.iter().enumerate() {
            *scores.entry(*id).or_insert(0.0) += 1.0 / (k + (rank + 1) as f64);
        }
    }

    let mut fused: Vec<(Uuid, f64)> = scores.into_iter().collect();
    fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_in_multiple_lists_outranks_single_list_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lists = vec![vec![a, b], vec![a]];
        let fused = fuse(&lists, 60.0);
        assert_eq!(fused[0].0, a);
    }

    #[test]
    fn empty_lists_produce_empty_fusion() {
        let fused = fuse(&[], 60.0);
        assert!(fused.is_empty());
    }

    #[test]
    fn higher_rank_scores_higher() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let fused = fuse(&[vec![a, b]], 60.0);
        assert_eq!(fused[0].0, a);
        assert!(fused[0].1 > fused[1].1);
    }
}
