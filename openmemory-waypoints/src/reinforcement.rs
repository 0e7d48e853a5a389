use openmemory_core::memory::Waypoint;

/// Applies one reinforcement step: `weight <- min(1, weight + eta *
/// activation)` (spec.md §4.3). Creates a fresh edge at that weight if
/// `existing` is `None`.
pub fn reinforce(existing: Option<Waypoint>, from: uuid::Uuid, to: uuid::Uuid, eta: f64, activation: f64) -> Waypoint {
    let delta = eta * activation;
    match existing {
        Some(mut waypoint) => {
            waypoint.reinforce(delta);
            waypoint
        }
        None => Waypoint::new(from, to, delta.clamp(0.0, 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_new_edge_when_absent() {
        let (a, b) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        let wp = reinforce(None, a, b, 0.1, 2.0);
        assert!((wp.weight - 0.2).abs() < 1e-9);
        assert_eq!(wp.coactivation_count, 1);
    }

    #[test]
    fn reinforces_existing_edge_and_saturates() {
        let (a, b) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        let mut wp = Waypoint::new(a, b, 0.9);
        wp = reinforce(Some(wp), a, b, 0.5, 1.0);
        assert_eq!(wp.weight, 1.0);
        assert_eq!(wp.coactivation_count, 2);
    }
}
