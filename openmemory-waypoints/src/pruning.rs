use openmemory_core::memory::Waypoint;

/// Result of a pruning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneResult {
    pub edges_removed: usize,
    pub edges_kept: usize,
}

/// Removes waypoints below `threshold`. Runs in the same maintenance pass
/// as reinforcement (spec.md §4.3), after the buffer has been flushed.
pub fn prune_weak(waypoints: Vec<Waypoint>, threshold: f64) -> (Vec<Waypoint>, PruneResult) {
    let (kept, removed): (Vec<_>, Vec<_>) = waypoints.into_iter().partition(|w| !w.below_threshold(threshold));
    let result = PruneResult { edges_removed: removed.len(), edges_kept: kept.len() };
    (kept, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn removes_edges_below_threshold() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let weak = Waypoint::new(a, b, 0.01);
        let strong = Waypoint::new(a, c, 0.8);

        let (kept, result) = prune_weak(vec![weak, strong], 0.05);
        assert_eq!(result.edges_removed, 1);
        assert_eq!(result.edges_kept, 1);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].weight >= 0.05);
    }
}
