use chrono::{DateTime, Utc};
use uuid::Uuid;

use openmemory_core::memory::TemporalEdge;
use openmemory_core::{OpenMemoryError, OpenMemoryResult};

/// Edge counterpart to `insert::InsertOutcome` — edges follow the same
/// bitemporal interval model as facts (spec.md §4.5, "Edges follow the
/// same interval model"), keyed by `(from_entity, relation, to_entity, userId)`.
#[derive(Debug, Clone)]
pub enum EdgeInsertOutcome {
    Created(TemporalEdge),
    Reinforced(TemporalEdge),
}

pub fn plan_insert_edge(
    current_active: Option<&TemporalEdge>,
    user_id: &str,
    from_entity: &str,
    relation: &str,
    to_entity: &str,
    valid_from: DateTime<Utc>,
    weight: f64,
    confidence: f64,
    reinforcement_alpha: f64,
) -> EdgeInsertOutcome {
    match current_active {
        Some(active) => {
            let mut reinforced = active.clone();
            reinforced.weight = weight.max(reinforced.weight);
            reinforced.confidence = (reinforced.confidence + reinforcement_alpha * (1.0 - reinforced.confidence)).clamp(0.0, 1.0);
            reinforced.last_updated = valid_from;
            EdgeInsertOutcome::Reinforced(reinforced)
        }
        None => EdgeInsertOutcome::Created(TemporalEdge {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            from_entity: from_entity.to_string(),
            relation: relation.to_string(),
            to_entity: to_entity.to_string(),
            weight,
            confidence: confidence.clamp(0.0, 1.0),
            valid_from,
            valid_to: None,
            last_updated: valid_from,
        }),
    }
}

pub fn invalidate_edge(edge: &TemporalEdge, at: DateTime<Utc>) -> OpenMemoryResult<TemporalEdge> {
    if at < edge.valid_from {
        return Err(OpenMemoryError::integrity("validTo cannot be before validFrom"));
    }
    let mut closed = edge.clone();
    closed.valid_to = Some(at);
    closed.last_updated = at;
    Ok(closed)
}

/// Edges active at `at`, mirroring `query::facts_at_time`.
pub fn edges_at_time<'a>(edges: &'a [TemporalEdge], at: DateTime<Utc>) -> Vec<&'a TemporalEdge> {
    edges.iter().filter(|e| at >= e.valid_from && e.valid_to.map_or(true, |end| at < end)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn edge(weight: f64, valid_from: DateTime<Utc>) -> TemporalEdge {
        TemporalEdge {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            from_entity: "alice".into(),
            relation: "collaboratesWith".into(),
            to_entity: "bob".into(),
            weight,
            confidence: 0.7,
            valid_from,
            valid_to: None,
            last_updated: valid_from,
        }
    }

    #[test]
    fn no_active_edge_creates() {
        let outcome = plan_insert_edge(None, "u1", "alice", "collaboratesWith", "bob", Utc::now(), 0.5, 0.6, 0.2);
        assert!(matches!(outcome, EdgeInsertOutcome::Created(_)));
    }

    #[test]
    fn existing_edge_reinforces_weight_and_confidence() {
        let now = Utc::now();
        let active = edge(0.3, now);
        let outcome = plan_insert_edge(Some(&active), "u1", "alice", "collaboratesWith", "bob", now + Duration::days(1), 0.6, 0.5, 0.2);
        match outcome {
            EdgeInsertOutcome::Reinforced(e) => {
                assert!(e.weight >= 0.6);
                assert!(e.confidence > 0.3);
            }
            EdgeInsertOutcome::Created(_) => panic!("expected Reinforced"),
        }
    }

    #[test]
    fn invalidate_before_valid_from_rejected() {
        let now = Utc::now();
        let e = edge(0.5, now);
        let err = invalidate_edge(&e, now - Duration::days(1)).unwrap_err();
        assert!(matches!(err, OpenMemoryError::Integrity { .. }));
    }
}
