use chrono::{DateTime, Utc};

use openmemory_core::memory::TemporalFact;

/// Transition count and average active-interval duration for a
/// `(subject, predicate)` pair over a window (spec.md §4.5
/// `changeFrequency`). `facts` should already be filtered to the pair and
/// window of interest; still-active facts are treated as running to `now`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeFrequency {
    pub transitions: usize,
    pub avg_active_duration_days: f64,
}

pub fn change_frequency(facts: &[TemporalFact], now: DateTime<Utc>) -> ChangeFrequency {
    if facts.is_empty() {
        return ChangeFrequency { transitions: 0, avg_active_duration_days: 0.0 };
    }

    let durations: Vec<f64> = facts
        .iter()
        .map(|f| {
            let end = f.valid_to.unwrap_or(now);
            (end - f.valid_from).num_seconds().max(0) as f64 / 86400.0
        })
        .collect();

    let avg_active_duration_days = durations.iter().sum::<f64>() / durations.len() as f64;

    // A transition is a fact that was superseded, i.e. every closed fact
    // except the subject's current active one (which, if present, has no
    // successor yet).
    let transitions = facts.iter().filter(|f| !f.is_active()).count();

    ChangeFrequency { transitions, avg_active_duration_days }
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
            object: "x".into(),
            confidence: 0.8,
            valid_from,
            valid_to,
            metadata: HashMap::new(),
            last_updated: valid_from,
            superseded_by: None,
        }
    }

    #[test]
    fn empty_window_has_zero_frequency() {
        let freq = change_frequency(&[], Utc::now());
        assert_eq!(freq.transitions, 0);
        assert_eq!(freq.avg_active_duration_days, 0.0);
    }

    #[test]
    fn counts_closed_facts_as_transitions() {
        let now = Utc::now();
        let facts = vec![
            fact(now - Duration::days(30), Some(now - Duration::days(20))),
            fact(now - Duration::days(20), Some(now - Duration::days(10))),
            fact(now - Duration::days(10), None),
        ];
        let freq = change_frequency(&facts, now);
        assert_eq!(freq.transitions, 2);
        assert!(freq.avg_active_duration_days > 0.0);
    }

    #[test]
    fn still_active_fact_runs_to_now() {
        let now = Utc::now();
        let facts = vec![fact(now - Duration::days(5), None)];
        let freq = change_frequency(&facts, now);
        assert!((freq.avg_active_duration_days - 5.0).abs() < 0.01);
    }
}
