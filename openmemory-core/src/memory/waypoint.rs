use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weighted, directed edge in the waypoint graph connecting two memories
/// that have been retrieved, created, or reinforced together (spec.md §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub from_memory_id: Uuid,
    pub to_memory_id: Uuid,
    pub weight: f64,
    pub coactivation_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_reinforced_at: DateTime<Utc>,
}

impl Waypoint {
    pub fn new(from_memory_id: Uuid, to_memory_id: Uuid, initial_weight: f64) -> Self {
        let now = Utc::now();
        Waypoint {
            from_memory_id,
            to_memory_id,
            weight: initial_weight,
            coactivation_count: 1,
            created_at: now,
            last_reinforced_at: now,
        }
    }

    /// Strengthens the edge on a fresh coactivation, saturating toward 1.0.
    pub fn reinforce(&mut self, delta: f64) {
        self.coactivation_count += 1;
        self.weight = (self.weight + delta).min(1.0);
        self.last_reinforced_at = Utc::now();
    }

    pub fn below_threshold(&self, threshold: f64) -> bool {
        self.weight < threshold
    }
}
