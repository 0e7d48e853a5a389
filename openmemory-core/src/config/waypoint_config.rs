use serde::{Deserialize, Serialize};

use super::defaults;

/// Waypoint graph maintenance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    /// Edges below this weight are pruned during maintenance.
    pub prune_threshold: f64,
    /// Weight added to an edge on each fresh coactivation.
    pub coactivation_reinforcement_delta: f64,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            prune_threshold: defaults::DEFAULT_WAYPOINT_PRUNE_THRESHOLD,
            coactivation_reinforcement_delta: defaults::DEFAULT_COACTIVATION_REINFORCEMENT_DELTA,
        }
    }
}
