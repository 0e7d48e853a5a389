use chrono::{DateTime, Utc};

use openmemory_core::memory::TemporalFact;

/// Facts active at a single instant: `validFrom <= at < (validTo ∨ ∞)`
/// (spec.md §4.5 `queryFactsAtTime`). At most one per `(subject, predicate)`
/// holds under the insert invariants, but callers may pass facts spanning
/// several predicates at once.
pub fn facts_at_time<'a>(facts: &'a [TemporalFact], at: DateTime<Utc>) -> Vec<&'a TemporalFact> {
    facts.iter().filter(|f| f.is_active_at(at)).collect()
}

/// Facts whose `[validFrom, validTo∨∞]` interval intersects `[from, to]`
/// (spec.md §4.5 `queryFactsInRange`).
pub fn facts_in_range<'a>(facts: &'a [TemporalFact], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&'a TemporalFact> {
    facts
        .iter()
        .filter(|f| {
            let end = f.valid_to.unwrap_or(DateTime::<Utc>::MAX_UTC);
            f.valid_from <= to && end >= from
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn fact(valid_from: DateTime<Utc>, valid_to: Option<DateTime<Utc>>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: "livesIn".into(),
            object: "boston".into(),
            confidence: 0.8,
            valid_from,
            valid_to,
            metadata: HashMap::new(),
            last_updated: valid_from,
            superseded_by: None,
        }
    }

    #[test]
    fn at_time_excludes_facts_not_yet_started() {
        let now = Utc::now();
        let f = fact(now + Duration::days(1), None);
        assert!(facts_at_time(&[f], now).is_empty());
    }

    #[test]
    fn at_time_excludes_closed_facts_after_valid_to() {
        let now = Utc::now();
        let f = fact(now - Duration::days(10), Some(now - Duration::days(1)));
        assert!(facts_at_time(&[f], now).is_empty());
    }

    #[test]
    fn range_includes_facts_overlapping_the_window() {
        let now = Utc::now();
        let f = fact(now - Duration::days(5), Some(now - Duration::days(3)));
        let matches = facts_in_range(&[f], now - Duration::days(10), now);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn range_excludes_facts_entirely_outside_the_window() {
        let now = Utc::now();
        let f = fact(now - Duration::days(100), Some(now - Duration::days(90)));
        let matches = facts_in_range(&[f], now - Duration::days(10), now);
        assert!(matches.is_empty());
    }
}
