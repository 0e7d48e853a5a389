use std::collections::HashMap;

use uuid::Uuid;

/// Bounded one-hop waypoint propagation: for each candidate, sums the
/// weights of waypoints connecting it to any *other* candidate already in
/// the pool, normalized to `[0, 1]` by the largest such sum in the batch.
/// Bounded to one hop and to the current result set so a densely
/// connected corpus can't make this term runaway (spec.md §4.3).
pub fn boost(candidates: &[Uuid], edge_weight: impl Fn(Uuid, Uuid) -> Option<f64>) -> HashMap<Uuid, f64> {
    let mut raw: HashMap<Uuid, f64> = HashMap::new();

    for &a in candidates {
        let mut sum = 0.0;
        for &b in candidates {
            if a == b {
                continue;
            }
            if let Some(w) = edge_weight(a, b).or_else(|| edge_weight(b, a)) {
                sum += w;
            }
        }
        raw.insert(a, sum);
    }

    let max = raw.values().cloned().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return raw.into_iter().map(|(id, _)| (id, 0.0)).collect();
    }

    raw.into_iter().map(|(id, v)| (id, v / max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolated_candidates_get_zero_boost() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let boosted = boost(&ids, |_, _| None);
        assert!(boosted.values().all(|&v| v == 0.0));
    }

    #[test]
    fn connected_candidate_outscores_isolated_one() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let ids = vec![a, b, c];
        let boosted = boost(&ids, |x, y| if (x, y) == (a, b) { Some(0.5) } else { None });
        assert!(boosted[&a] > boosted[&c]);
        assert_eq!(boosted[&c], 0.0);
    }
}
