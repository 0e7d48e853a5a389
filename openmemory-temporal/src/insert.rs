use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use openmemory_core::memory::TemporalFact;

/// What happened as a result of `plan_insert` (spec.md §4.5 `insertFact`).
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// No active fact existed for `(subject, predicate, userId)`.
    Created(TemporalFact),
    /// The active fact already asserted the same object; confidence bumped.
    Reinforced(TemporalFact),
    /// The active fact asserted a different object: it's closed and a new
    /// one created, linked by `superseded_by`.
    Superseded { closed: TemporalFact, created: TemporalFact },
}

/// Decides how to apply an incoming fact assertion against the current
/// active fact (if any) for the same `(subject, predicate, userId)`.
/// Pure — does not touch storage; callers persist the outcome.
#[allow(clippy::too_many_arguments)]
pub fn plan_insert(
    current_active: Option<&TemporalFact>,
    user_id: &str,
    subject: &str,
    predicate: &str,
    object: &str,
    valid_from: DateTime<Utc>,
    confidence: f64,
    metadata: HashMap<String, Value>,
    reinforcement_alpha: f64,
) -> InsertOutcome {
    match current_active {
        None => InsertOutcome::Created(TemporalFact {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            valid_from,
            valid_to: None,
            metadata,
            last_updated: valid_from,
            superseded_by: None,
        }),
        Some(active) if active.object == object => {
            let mut reinforced = active.clone();
            reinforced.confidence = (reinforced.confidence + reinforcement_alpha * (1.0 - reinforced.confidence)).clamp(0.0, 1.0);
            reinforced.last_updated = valid_from;
            InsertOutcome::Reinforced(reinforced)
        }
        Some(active) => {
            let mut closed = active.clone();
            // Close one millisecond before the new fact's validity starts so
            // the two intervals never overlap (spec.md §4.5 step 4).
            closed.close(valid_from - Duration::milliseconds(1), None);

            let created = TemporalFact {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                subject: subject.to_string(),
                predicate: predicate.to_string(),
                object: object.to_string(),
                confidence: confidence.clamp(0.0, 1.0),
                valid_from,
                valid_to: None,
                metadata,
                last_updated: valid_from,
                superseded_by: None,
            };
            closed.superseded_by = Some(created.id);

            InsertOutcome::Superseded { closed, created }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(object: &str, confidence: f64, valid_from: DateTime<Utc>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: "livesIn".into(),
            object: object.into(),
            confidence,
            valid_from,
            valid_to: None,
            metadata: HashMap::new(),
            last_updated: valid_from,
            superseded_by: None,
        }
    }

    #[test]
    fn no_active_fact_creates() {
        let now = Utc::now();
        let outcome = plan_insert(None, "u1", "alice", "livesIn", "boston", now, 0.8, HashMap::new(), 0.2);
        assert!(matches!(outcome, InsertOutcome::Created(_)));
    }

    #[test]
    fn same_object_reinforces() {
        let now = Utc::now();
        let active = fact("boston", 0.5, now);
        let outcome = plan_insert(Some(&active), "u1", "alice", "livesIn", "boston", now + Duration::days(1), 0.5, HashMap::new(), 0.2);
        match outcome {
            InsertOutcome::Reinforced(f) => assert!(f.confidence > 0.5),
            other => panic!("expected Reinforced, got {other:?}"),
        }
    }

    #[test]
    fn different_object_supersedes() {
        let now = Utc::now();
        let active = fact("boston", 0.8, now);
        let outcome = plan_insert(Some(&active), "u1", "alice", "livesIn", "seattle", now + Duration::days(1), 0.7, HashMap::new(), 0.2);
        match outcome {
            InsertOutcome::Superseded { closed, created } => {
                assert!(!closed.is_active());
                assert_eq!(closed.superseded_by, Some(created.id));
                assert_eq!(created.object, "seattle");
            }
            other => panic!("expected Superseded, got {other:?}"),
        }
    }
}
