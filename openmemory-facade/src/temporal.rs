//! `Temporal.*` façade operations (spec.md §6, §4.5): each wraps a pure
//! `openmemory-temporal` computation with the storage fetch/persist it
//! needs. Facts and edges follow the same shape throughout.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use openmemory_core::memory::{TemporalEdge, TemporalFact, TenantScope};
use openmemory_core::{OpenMemoryError, OpenMemoryResult};
use openmemory_temporal::{ChangeFrequency, Comparison, EdgeInsertOutcome, InsertOutcome};

use crate::runtime::OpenMemory;

impl OpenMemory {
    #[allow(clippy::too_many_arguments)]
    pub fn insert_fact(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        subject: &str,
        predicate: &str,
        object: &str,
        valid_from: DateTime<Utc>,
        confidence: f64,
        metadata: HashMap<String, Value>,
    ) -> OpenMemoryResult<InsertOutcome> {
        let key = format!("temporal-fact:{user_id}:{subject}:{predicate}");
        self.with_key_lock(&key, || {
            let current = self.storage.active_fact(tenant, user_id, subject, predicate)?;
            let outcome =
                self.temporal.insert_fact(current.as_ref(), user_id, subject, predicate, object, valid_from, confidence, metadata);

            match &outcome {
                InsertOutcome::Created(fact) => self.storage.insert_fact(tenant, fact)?,
                InsertOutcome::Reinforced(fact) => self.storage.update_fact(tenant, fact)?,
                InsertOutcome::Superseded { closed, created } => {
                    self.storage.update_fact(tenant, closed)?;
                    self.storage.insert_fact(tenant, created)?;
                }
            }
            Ok(outcome)
        })
    }

    pub fn invalidate_fact(&self, tenant: &TenantScope, id: Uuid, at: DateTime<Utc>) -> OpenMemoryResult<TemporalFact> {
        let fact = self.storage.fact_by_id(tenant, id)?.ok_or_else(|| OpenMemoryError::not_found(format!("fact {id}")))?;
        let invalidated = self.temporal.invalidate_fact(&fact, at)?;
        self.storage.update_fact(tenant, &invalidated)?;
        Ok(invalidated)
    }

    pub fn query_facts_at(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        subject: &str,
        predicate: Option<&str>,
        at: DateTime<Utc>,
    ) -> OpenMemoryResult<Vec<TemporalFact>> {
        let facts = self.facts_for(tenant, user_id, subject, predicate)?;
        Ok(self.temporal.query_at_time(&facts, at).into_iter().cloned().collect())
    }

    pub fn query_facts_range(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        subject: &str,
        predicate: Option<&str>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> OpenMemoryResult<Vec<TemporalFact>> {
        let facts = self.facts_for(tenant, user_id, subject, predicate)?;
        Ok(self.temporal.query_range(&facts, from, to).into_iter().cloned().collect())
    }

    pub fn compare_time_points(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        subject: &str,
        t1: DateTime<Utc>,
        t2: DateTime<Utc>,
    ) -> OpenMemoryResult<Comparison> {
        let facts = self.storage.facts_for_subject(tenant, user_id, subject)?;
        Ok(self.temporal.compare(&facts, t1, t2))
    }

    /// Every fact asserted about `subject`, ordered by `valid_from` — the
    /// projection `Ide::getPatterns` and simple "what changed" UIs read.
    pub fn timeline(&self, tenant: &TenantScope, user_id: &str, subject: &str) -> OpenMemoryResult<Vec<TemporalFact>> {
        let mut facts = self.storage.facts_for_subject(tenant, user_id, subject)?;
        facts.sort_by_key(|f| f.valid_from);
        Ok(facts)
    }

    pub fn change_frequency(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        subject: &str,
        predicate: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> OpenMemoryResult<ChangeFrequency> {
        let window_start = now - Duration::days(window_days);
        let facts: Vec<TemporalFact> = self
            .storage
            .facts_for_subject(tenant, user_id, subject)?
            .into_iter()
            .filter(|f| f.predicate == predicate && f.valid_to.map_or(true, |vt| vt >= window_start))
            .collect();
        Ok(self.temporal.change_frequency(&facts, now))
    }

    fn facts_for(&self, tenant: &TenantScope, user_id: &str, subject: &str, predicate: Option<&str>) -> OpenMemoryResult<Vec<TemporalFact>> {
        let facts = self.storage.facts_for_subject(tenant, user_id, subject)?;
        Ok(match predicate {
            Some(p) => facts.into_iter().filter(|f| f.predicate == p).collect(),
            None => facts,
        })
    }

    // -------------------------------------------------------------
    // Edges — same bitemporal shape as facts (spec.md §4.5).
    // -------------------------------------------------------------

    pub fn insert_edge(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        from_entity: &str,
        relation: &str,
        to_entity: &str,
        valid_from: DateTime<Utc>,
        weight: f64,
        confidence: f64,
    ) -> OpenMemoryResult<EdgeInsertOutcome> {
        let key = format!("temporal-edge:{user_id}:{from_entity}:{relation}:{to_entity}");
        self.with_key_lock(&key, || {
            let current = self.storage.active_edge(tenant, user_id, from_entity, relation, to_entity)?;
            let outcome =
                self.temporal.insert_edge(current.as_ref(), user_id, from_entity, relation, to_entity, valid_from, weight, confidence);

            match &outcome {
                EdgeInsertOutcome::Created(edge) => self.storage.insert_edge(tenant, edge)?,
                EdgeInsertOutcome::Reinforced(edge) => self.storage.update_edge(tenant, edge)?,
            }
            Ok(outcome)
        })
    }

    pub fn invalidate_edge(&self, tenant: &TenantScope, id: Uuid, at: DateTime<Utc>) -> OpenMemoryResult<TemporalEdge> {
        let edge = self.storage.edge_by_id(tenant, id)?.ok_or_else(|| OpenMemoryError::not_found(format!("edge {id}")))?;
        let invalidated = self.temporal.invalidate_edge(&edge, at)?;
        self.storage.update_edge(tenant, &invalidated)?;
        Ok(invalidated)
    }

    pub fn edges_at(&self, tenant: &TenantScope, user_id: &str, entity: &str, at: DateTime<Utc>) -> OpenMemoryResult<Vec<TemporalEdge>> {
        let edges = self.storage.edges_for_entity(tenant, user_id, entity)?;
        Ok(self.temporal.edges_at_time(&edges, at).into_iter().cloned().collect())
    }
}
