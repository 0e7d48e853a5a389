use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use openmemory_core::config::TemporalConfig;
use openmemory_core::memory::{TemporalEdge, TemporalFact};
use openmemory_core::OpenMemoryResult;

use crate::compare::{self, Comparison};
use crate::decay::{self, DecayOutcome};
use crate::edge::{self, EdgeInsertOutcome};
use crate::frequency::{self, ChangeFrequency};
use crate::insert::{self, InsertOutcome};
use crate::invalidate;
use crate::query;

/// Storage-agnostic bitemporal reasoning over facts (spec.md §4.5).
/// Every method is pure given its inputs; callers own fetching the
/// relevant facts from `openmemory-storage` and persisting outcomes.
pub struct TemporalEngine {
    config: TemporalConfig,
}

impl TemporalEngine {
    pub fn new(config: TemporalConfig) -> Self {
        TemporalEngine { config }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_fact(
        &self,
        current_active: Option<&TemporalFact>,
        user_id: &str,
        subject: &str,
        predicate: &str,
        object: &str,
        valid_from: DateTime<Utc>,
        confidence: f64,
        metadata: HashMap<String, Value>,
    ) -> InsertOutcome {
        insert::plan_insert(current_active, user_id, subject, predicate, object, valid_from, confidence, metadata, self.config.reinforcement_alpha)
    }

    pub fn invalidate_fact(&self, fact: &TemporalFact, at: DateTime<Utc>) -> OpenMemoryResult<TemporalFact> {
        invalidate::invalidate(fact, at)
    }

    pub fn query_at_time<'a>(&self, facts: &'a [TemporalFact], at: DateTime<Utc>) -> Vec<&'a TemporalFact> {
        query::facts_at_time(facts, at)
    }

    pub fn query_range<'a>(&self, facts: &'a [TemporalFact], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&'a TemporalFact> {
        query::facts_in_range(facts, from, to)
    }

    pub fn compare(&self, facts: &[TemporalFact], t1: DateTime<Utc>, t2: DateTime<Utc>) -> Comparison {
        compare::compare_time_points(facts, t1, t2)
    }

    pub fn change_frequency(&self, facts: &[TemporalFact], now: DateTime<Utc>) -> ChangeFrequency {
        frequency::change_frequency(facts, now)
    }

    /// Runs the confidence-decay sweep over a batch of active facts.
    pub fn decay_sweep(&self, active_facts: &[TemporalFact], now: DateTime<Utc>) -> Vec<DecayOutcome> {
        active_facts.iter().map(|f| decay::decay_one(f, now, self.config.confidence_decay_lambda, self.config.confidence_floor)).collect()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_edge(
        &self,
        current_active: Option<&TemporalEdge>,
        user_id: &str,
        from_entity: &str,
        relation: &str,
        to_entity: &str,
        valid_from: DateTime<Utc>,
        weight: f64,
        confidence: f64,
    ) -> EdgeInsertOutcome {
        edge::plan_insert_edge(current_active, user_id, from_entity, relation, to_entity, valid_from, weight, confidence, self.config.reinforcement_alpha)
    }

    pub fn invalidate_edge(&self, e: &TemporalEdge, at: DateTime<Utc>) -> OpenMemoryResult<TemporalEdge> {
        edge::invalidate_edge(e, at)
    }

    pub fn edges_at_time<'a>(&self, edges: &'a [TemporalEdge], at: DateTime<Utc>) -> Vec<&'a TemporalEdge> {
        edge::edges_at_time(edges, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    #[test]
    fn insert_fact_creates_when_nothing_active() {
        let engine = TemporalEngine::new(TemporalConfig::default());
        let outcome = engine.insert_fact(None, "u1", "alice", "livesIn", "boston", Utc::now(), 0.8, Map::new());
        assert!(matches!(outcome, InsertOutcome::Created(_)));
    }

    #[test]
    fn decay_sweep_processes_every_fact() {
        let engine = TemporalEngine::new(TemporalConfig::default());
        let now = Utc::now();
        let facts = vec![
            TemporalFact {
                id: uuid::Uuid::new_v4(),
                user_id: "u1".into(),
                subject: "alice".into(),
                predicate: "likes".into(),
                object: "tea".into(),
                confidence: 0.9,
                valid_from: now,
                valid_to: None,
                metadata: Map::new(),
                last_updated: now,
                superseded_by: None,
            };
            3
        ];
        let outcomes = engine.decay_sweep(&facts, now);
        assert_eq!(outcomes.len(), 3);
    }
}
