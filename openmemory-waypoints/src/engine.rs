use openmemory_core::config::WaypointConfig;
use openmemory_core::memory::Waypoint;
use uuid::Uuid;

use crate::coactivation::{Coactivation, CoactivationBuffer};
use crate::pruning::{self, PruneResult};
use crate::reinforcement;

/// Orchestrates the waypoint lifecycle: buffering coactivations during
/// search, reinforcing edges on flush, and pruning weak ones in the same
/// pass. Holds no storage handle — callers look existing edges up and
/// persist the results through `openmemory-storage`.
pub struct WaypointEngine {
    config: WaypointConfig,
}

impl Default for WaypointEngine {
    fn default() -> Self {
        Self::new(WaypointConfig::default())
    }
}

impl WaypointEngine {
    pub fn new(config: WaypointConfig) -> Self {
        Self { config }
    }

    pub fn record_coactivation(&self, buffer: &CoactivationBuffer, tenant: Uuid, a: Uuid, b: Uuid, activation: f64) {
        buffer.record(tenant, a, b, activation);
    }

    /// Applies reinforcement to every drained coactivation. `lookup`
    /// resolves the current edge for a pair (if any) from storage.
    pub fn reinforce_batch(
        &self,
        buffer: &CoactivationBuffer,
        mut lookup: impl FnMut(Uuid, Uuid, Uuid) -> Option<Waypoint>,
    ) -> Vec<Waypoint> {
        buffer
            .drain()
            .into_iter()
            .map(|Coactivation { tenant, from, to, activation }| {
                let existing = lookup(tenant, from, to);
                reinforcement::reinforce(existing, from, to, self.config.coactivation_reinforcement_delta, activation)
            })
            .collect()
    }

    /// Prunes weak edges out of a candidate set, typically everything
    /// touched by the current reinforcement pass plus any cold leftovers
    /// swept in separately by maintenance.
    pub fn prune(&self, waypoints: Vec<Waypoint>) -> (Vec<Waypoint>, PruneResult) {
        pruning::prune_weak(waypoints, self.config.prune_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinforce_batch_creates_edges_for_each_pair() {
        let engine = WaypointEngine::default();
        let buffer = CoactivationBuffer::new();
        let tenant = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        buffer.record(tenant, a, b, 1.0);

        let waypoints = engine.reinforce_batch(&buffer, |_, _, _| None);
        assert_eq!(waypoints.len(), 1);
        assert!(waypoints[0].weight > 0.0);
    }

    #[test]
    fn prune_removes_edges_below_configured_threshold() {
        let engine = WaypointEngine::new(WaypointConfig { prune_threshold: 0.5, coactivation_reinforcement_delta: 0.1 });
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let weak = Waypoint::new(a, b, 0.1);
        let (kept, result) = engine.prune(vec![weak]);
        assert_eq!(result.edges_removed, 1);
        assert!(kept.is_empty());
    }
}
