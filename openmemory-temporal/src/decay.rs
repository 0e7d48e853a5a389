use chrono::{DateTime, Utc};

use openmemory_core::memory::TemporalFact;

/// Outcome of a single confidence-decay sweep step (spec.md §4.5
/// "Confidence decay").
#[derive(Debug, Clone)]
pub enum DecayOutcome {
    /// Confidence decayed but stayed above the floor.
    Decayed(TemporalFact),
    /// Confidence dropped below the floor; the fact auto-closes as of `now`.
    AutoClosed(TemporalFact),
}

/// Applies `confidence *= exp(-lambda * elapsed_days)` to an active fact,
/// closing it if the result drops below `floor`. Inactive facts are
/// untouched by the sweep — callers should only pass active facts in.
pub fn decay_one(fact: &TemporalFact, now: DateTime<Utc>, lambda: f64, floor: f64) -> DecayOutcome {
    let elapsed_days = (now - fact.last_updated).num_seconds().max(0) as f64 / 86400.0;
    let decayed_confidence = fact.confidence * (-lambda * elapsed_days).exp();

    let mut updated = fact.clone();
    updated.confidence = decayed_confidence;
    updated.last_updated = now;

    if decayed_confidence < floor {
        updated.close(now, updated.superseded_by);
        DecayOutcome::AutoClosed(updated)
    } else {
        DecayOutcome::Decayed(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn fact(confidence: f64, last_updated: DateTime<Utc>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: "likes".into(),
            object: "coffee".into(),
            confidence,
            valid_from: last_updated,
            valid_to: None,
            metadata: HashMap::new(),
            last_updated,
            superseded_by: None,
        }
    }

    #[test]
    fn mild_decay_keeps_fact_active() {
        let now = Utc::now();
        let f = fact(0.9, now - Duration::days(1));
        match decay_one(&f, now, 0.01, 0.1) {
            DecayOutcome::Decayed(updated) => {
                assert!(updated.confidence < 0.9);
                assert!(updated.is_active());
            }
            DecayOutcome::AutoClosed(_) => panic!("expected Decayed"),
        }
    }

    #[test]
    fn heavy_decay_auto_closes() {
        let now = Utc::now();
        let f = fact(0.15, now - Duration::days(365));
        match decay_one(&f, now, 0.05, 0.1) {
            DecayOutcome::AutoClosed(updated) => assert!(!updated.is_active()),
            DecayOutcome::Decayed(_) => panic!("expected AutoClosed"),
        }
    }
}
