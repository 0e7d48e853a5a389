//! `Ide.getContext` / `Ide.getPatterns` (spec.md §6) — thin projections over
//! search and temporal reasoning for editor-integration callers. Neither
//! adds new storage access beyond what `search`/`Temporal.*` already do.

use chrono::Utc;

use openmemory_core::memory::{TemporalFact, TenantScope};
use openmemory_core::OpenMemoryResult;
use openmemory_hsg::{SearchOptions, SearchResult};
use openmemory_temporal::ChangeFrequency;

use crate::runtime::OpenMemory;

/// What an IDE assistant would want alongside a query: the memories it
/// matched, plus whatever is currently asserted as true about the same
/// subject.
#[derive(Debug, Clone)]
pub struct IdeContext {
    pub memories: Vec<SearchResult>,
    pub active_facts: Vec<TemporalFact>,
}

/// A subject's history plus a summary of how often it changes — the
/// "has this actually been stable" signal an IDE would surface inline.
#[derive(Debug, Clone)]
pub struct IdePatterns {
    pub timeline: Vec<TemporalFact>,
    pub frequency: ChangeFrequency,
}

impl OpenMemory {
    pub fn get_context(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        query: &str,
        opts: SearchOptions,
    ) -> OpenMemoryResult<IdeContext> {
        let memories = self.search(tenant, query, opts)?;
        let active_facts = self
            .storage
            .facts_for_subject(tenant, user_id, query)?
            .into_iter()
            .filter(|f| f.is_active())
            .collect();
        Ok(IdeContext { memories, active_facts })
    }

    pub fn get_patterns(
        &self,
        tenant: &TenantScope,
        user_id: &str,
        subject: &str,
        predicate: &str,
        window_days: i64,
    ) -> OpenMemoryResult<IdePatterns> {
        let timeline = self.timeline(tenant, user_id, subject)?;
        let frequency = self.change_frequency(tenant, user_id, subject, predicate, window_days, Utc::now())?;
        Ok(IdePatterns { timeline, frequency })
    }
}
