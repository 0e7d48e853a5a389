use std::collections::HashMap;

use chrono::{DateTime, Utc};

use openmemory_core::memory::TemporalFact;

use crate::query::facts_at_time;

/// Predicate-level diff between two snapshots of the same subject
/// (spec.md §4.5 `compareTimePoints`).
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    /// Predicates whose active object differs between `t1` and `t2`.
    pub changed: Vec<String>,
    /// Predicates whose active object is identical at both points.
    pub unchanged: Vec<String>,
    /// Predicates with no active fact at `t1` but one at `t2`.
    pub added: Vec<String>,
    /// Predicates with an active fact at `t1` but none at `t2`.
    pub removed: Vec<String>,
}

/// Compares the active-fact snapshot of `subject` at `t1` and `t2`, grouped
/// by predicate. `facts` should already be filtered to the subject (and
/// tenant/user) of interest.
pub fn compare_time_points(facts: &[TemporalFact], t1: DateTime<Utc>, t2: DateTime<Utc>) -> Comparison {
    let snapshot = |at: DateTime<Utc>| -> HashMap<String, String> {
        facts_at_time(facts, at).into_iter().map(|f| (f.predicate.clone(), f.object.clone())).collect()
    };

    let at_t1 = snapshot(t1);
    let at_t2 = snapshot(t2);

    let mut comparison = Comparison::default();
    for (predicate, object) in &at_t1 {
        match at_t2.get(predicate) {
            Some(object2) if object2 == object => comparison.unchanged.push(predicate.clone()),
            Some(_) => comparison.changed.push(predicate.clone()),
            None => comparison.removed.push(predicate.clone()),
        }
    }
    for predicate in at_t2.keys() {
        if !at_t1.contains_key(predicate) {
            comparison.added.push(predicate.clone());
        }
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap as Map;
    use uuid::Uuid;

    fn fact(predicate: &str, object: &str, valid_from: DateTime<Utc>, valid_to: Option<DateTime<Utc>>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: predicate.into(),
            object: object.into(),
            confidence: 0.8,
            valid_from,
            valid_to,
            metadata: Map::new(),
            last_updated: valid_from,
            superseded_by: None,
        }
    }

    #[test]
    fn detects_changed_added_and_removed_predicates() {
        let now = Utc::now();
        let facts = vec![
            fact("livesIn", "boston", now - Duration::days(10), Some(now - Duration::days(1))),
            fact("livesIn", "seattle", now - Duration::days(1), None),
            fact("worksAt", "acme", now - Duration::days(10), None),
            fact("hasPet", "dog", now - Duration::days(1), None),
        ];

        let cmp = compare_time_points(&facts, now - Duration::days(10), now);
        assert_eq!(cmp.changed, vec!["livesIn".to_string()]);
        assert_eq!(cmp.unchanged, vec!["worksAt".to_string()]);
        assert_eq!(cmp.added, vec!["hasPet".to_string()]);
        assert!(cmp.removed.is_empty());
    }
}
