use chrono::{DateTime, Utc};

use openmemory_core::memory::TemporalFact;
use openmemory_core::{OpenMemoryError, OpenMemoryResult};

/// Closes `fact` as of `at` (spec.md §4.5 `invalidateFact`). Rejects with
/// an Integrity error if `at` precedes `valid_from` — a fact can't become
/// invalid before it started being true.
pub fn invalidate(fact: &TemporalFact, at: DateTime<Utc>) -> OpenMemoryResult<TemporalFact> {
    if at < fact.valid_from {
        return Err(OpenMemoryError::integrity("validTo cannot be before validFrom"));
    }
    let mut closed = fact.clone();
    closed.close(at, closed.superseded_by);
    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn fact(valid_from: DateTime<Utc>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: "livesIn".into(),
            object: "boston".into(),
            confidence: 0.8,
            valid_from,
            valid_to: None,
            metadata: HashMap::new(),
            last_updated: valid_from,
            superseded_by: None,
        }
    }

    #[test]
    fn invalidating_before_valid_from_is_rejected() {
        let now = Utc::now();
        let f = fact(now);
        let err = invalidate(&f, now - Duration::days(1)).unwrap_err();
        assert!(matches!(err, OpenMemoryError::Integrity { .. }));
    }

    #[test]
    fn invalidating_after_valid_from_closes_the_fact() {
        let now = Utc::now();
        let f = fact(now);
        let closed = invalidate(&f, now + Duration::days(1)).unwrap();
        assert!(!closed.is_active());
    }
}
