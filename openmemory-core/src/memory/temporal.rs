use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bitemporal subject-predicate-object fact (spec.md §4.5).
///
/// `valid_from`/`valid_to` track when the fact held true in the world;
/// `last_updated` tracks when OpenMemory last touched this row (creation,
/// reinforcement, or confidence decay). A fact with `valid_to: None` is
/// active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalFact {
    pub id: Uuid,
    pub user_id: String,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f64,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub last_updated: DateTime<Utc>,
    pub superseded_by: Option<Uuid>,
}

impl TemporalFact {
    pub fn is_active(&self) -> bool {
        self.valid_to.is_none()
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.valid_from && self.valid_to.map_or(true, |end| instant < end)
    }

    /// Closes this fact as of `closed_at`, recording the fact that supersedes it.
    pub fn close(&mut self, closed_at: DateTime<Utc>, superseded_by: Option<Uuid>) {
        self.valid_to = Some(closed_at);
        self.superseded_by = superseded_by;
        self.last_updated = closed_at;
    }
}

/// A bitemporal relationship edge between two entities, parallel to
/// `TemporalFact` but carrying a typed relation rather than a free predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalEdge {
    pub id: Uuid,
    pub user_id: String,
    pub from_entity: String,
    pub relation: String,
    pub to_entity: String,
    pub weight: f64,
    pub confidence: f64,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl TemporalEdge {
    pub fn is_active(&self) -> bool {
        self.valid_to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_fact(now: DateTime<Utc>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: "livesIn".into(),
            object: "boston".into(),
            confidence: 0.9,
            valid_from: now,
            valid_to: None,
            metadata: HashMap::new(),
            last_updated: now,
            superseded_by: None,
        }
    }

    #[test]
    fn active_fact_has_no_valid_to() {
        let now = Utc::now();
        let fact = make_fact(now);
        assert!(fact.is_active());
        assert!(fact.is_active_at(now + Duration::days(1)));
    }

    #[test]
    fn closing_a_fact_sets_superseded_by() {
        let now = Utc::now();
        let successor = Uuid::new_v4();
        let mut fact = make_fact(now);
        fact.close(now + Duration::days(30), Some(successor));
        assert!(!fact.is_active());
        assert_eq!(fact.superseded_by, Some(successor));
    }
}
