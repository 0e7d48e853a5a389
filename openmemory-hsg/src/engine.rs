//! HsgEngine — the memory engine orchestrator: classification, dedup,
//! embedding, encryption, vector/metadata writes, hybrid retrieval,
//! coactivation and waypoint reinforcement, decay and consolidation
//! triggers (spec.md §4.3, the "HSG memory engine" row of §2).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use openmemory_classify::{classify, simhash64};
use openmemory_consolidation::{ColdCandidate, ConsolidationEngine};
use openmemory_core::config::OpenMemoryConfig;
use openmemory_core::memory::{Memory, Sector, TenantScope};
use openmemory_core::traits::{MetadataStore, VectorStore};
use openmemory_core::{OpenMemoryError, OpenMemoryResult};
use openmemory_decay::DecayEngine;
use openmemory_embeddings::EmbeddingEngine;
use openmemory_retrieval::{Candidate, RetrievalEngine};
use openmemory_storage::StorageEngine;
use openmemory_waypoints::{CoactivationBuffer, WaypointEngine};

use crate::dedup;
use crate::types::{AddOptions, AddOutcome, SearchOptions, SearchResult, UpdateOptions, UpdateOutcome};
use crate::union::union_best_sim;

const SEARCH_TEXT_KEY: &str = "search_text";

pub struct HsgEngine {
    storage: Arc<StorageEngine>,
    vectors: Arc<dyn VectorStore>,
    embeddings: Mutex<EmbeddingEngine>,
    decay: DecayEngine,
    waypoints: WaypointEngine,
    coactivation: CoactivationBuffer,
    retrieval: RetrievalEngine,
    consolidation: ConsolidationEngine,
    config: OpenMemoryConfig,
    master_key: [u8; 32],
    secondary_key: Option<[u8; 32]>,
}

impl HsgEngine {
    pub fn new(
        storage: Arc<StorageEngine>,
        vectors: Arc<dyn VectorStore>,
        embeddings: EmbeddingEngine,
        config: OpenMemoryConfig,
        master_key: [u8; 32],
        secondary_key: Option<[u8; 32]>,
    ) -> Self {
        HsgEngine {
            decay: DecayEngine::new(config.decay.clone()),
            waypoints: WaypointEngine::new(config.waypoints.clone()),
            coactivation: CoactivationBuffer::new(),
            retrieval: RetrievalEngine::new(config.retrieval.clone()),
            consolidation: ConsolidationEngine::new(config.consolidation.clone()),
            storage,
            vectors,
            embeddings: Mutex::new(embeddings),
            config,
            master_key,
            secondary_key,
        }
    }

    fn content_key(&self, memory_id: Uuid) -> OpenMemoryResult<[u8; 32]> {
        openmemory_crypto::derive_content_key(&self.master_key, memory_id.as_bytes(), &self.config.encryption.hkdf_info)
    }

    /// Decrypts `memory.content`. Not used by `add`/`update`/`delete`/
    /// `search`, which only ever handle ciphertext — this is the one seam
    /// callers (the facade) reach through to get plaintext back.
    pub fn decrypt_content(&self, memory: &Memory) -> OpenMemoryResult<String> {
        let key = self.content_key(memory.id)?;
        let secondary = if self.config.encryption.accept_secondary_key { self.secondary_key } else { None };
        let plaintext = openmemory_crypto::open_with_rotation(&key, secondary.as_ref().map(|k| k.as_slice()), &memory.content)?;
        String::from_utf8(plaintext).map_err(|e| OpenMemoryError::internal(format!("decrypted content not utf8: {e}")))
    }

    // ---------------------------------------------------------------
    // Add
    // ---------------------------------------------------------------

    pub fn add(&self, tenant: &TenantScope, user_id: &str, content: &str, opts: AddOptions) -> OpenMemoryResult<AddOutcome> {
        let (primary_sector, sectors) = classify(content);
        let simhash = simhash64(content);

        let neighborhood = self.storage.find_by_simhash_neighborhood(tenant, simhash, self.config.hsg.dedup_hamming_threshold)?;
        let same_user: Vec<Memory> = neighborhood.into_iter().filter(|m| m.user_id == user_id).collect();

        if let Some(existing) = dedup::pick_duplicate(simhash, &same_user) {
            let mut reinforced = existing.clone();
            reinforced.touch();
            reinforced.salience = reinforced.salience.reinforced(self.config.hsg.dedup_salience_boost);
            self.storage.update(tenant, &reinforced)?;
            info!(id = %reinforced.id, "add: reinforced existing duplicate");
            return Ok(AddOutcome { id: reinforced.id, duplicate_of: Some(reinforced.id) });
        }

        let mut memory = Memory::new(user_id, "", primary_sector);
        memory.sectors = sectors.clone();
        memory.tags = opts.tags;
        memory.metadata = opts.metadata;
        memory.metadata.insert(SEARCH_TEXT_KEY.to_string(), serde_json::Value::String(content.to_string()));
        memory.simhash = simhash;

        let vectors: Vec<(Sector, Vec<f32>)> = {
            let mut guard = self.embeddings.lock().expect("embedding engine poisoned");
            sectors
                .iter()
                .map(|sw| guard.embed_text(content).map(|v| (sw.sector, v)))
                .collect::<OpenMemoryResult<Vec<_>>>()?
        };
        memory.mean_vec = vectors.first().map(|(_, v)| v.clone());

        let key = self.content_key(memory.id)?;
        memory.content = openmemory_crypto::seal(&key, content.as_bytes())?;

        self.storage.create(tenant, &memory)?;

        for (sector, vector) in &vectors {
            if let Err(err) = self.vectors.upsert(memory.id, *sector, vector) {
                warn!(id = %memory.id, error = %err, "vector upsert failed, compensating metadata delete");
                let _ = self.storage.delete(tenant, memory.id);
                return Err(err);
            }
        }

        info!(id = %memory.id, sector = %primary_sector, "add: created memory");
        Ok(AddOutcome { id: memory.id, duplicate_of: None })
    }

    // ---------------------------------------------------------------
    // Get / Delete
    // ---------------------------------------------------------------

    pub fn get(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<Memory>> {
        self.storage.get(tenant, id)
    }

    pub fn delete(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<bool> {
        if self.storage.get(tenant, id)?.is_none() {
            return Ok(false);
        }
        self.storage.delete(tenant, id)?;
        self.vectors.delete_all_sectors(id)?;
        self.storage.delete_waypoints_touching(id)?;
        Ok(true)
    }

    // ---------------------------------------------------------------
    // Update
    // ---------------------------------------------------------------

    pub fn update(&self, tenant: &TenantScope, id: Uuid, opts: UpdateOptions) -> OpenMemoryResult<UpdateOutcome> {
        let mut memory = self.storage.get(tenant, id)?.ok_or_else(|| OpenMemoryError::not_found(format!("memory {id}")))?;

        if let Some(tags) = opts.tags {
            memory.tags = tags;
        }
        if let Some(metadata) = opts.metadata {
            for (k, v) in metadata {
                memory.metadata.insert(k, v);
            }
        }

        let Some(content) = opts.content else {
            self.storage.update(tenant, &memory)?;
            return Ok(UpdateOutcome::Updated(Box::new(memory)));
        };

        let (primary_sector, new_sectors) = classify(&content);
        let new_simhash = simhash64(&content);

        let neighborhood = self.storage.find_by_simhash_neighborhood(tenant, new_simhash, self.config.hsg.dedup_hamming_threshold)?;
        if let Some(colliding) = neighborhood.into_iter().find(|m| m.id != id && m.user_id == memory.user_id) {
            return Ok(UpdateOutcome::Conflict { colliding_id: colliding.id });
        }

        let old_sectors: Vec<Sector> = memory.sectors.iter().map(|sw| sw.sector).collect();
        let new_sector_set: Vec<Sector> = new_sectors.iter().map(|sw| sw.sector).collect();

        let vectors: Vec<(Sector, Vec<f32>)> = {
            let mut guard = self.embeddings.lock().expect("embedding engine poisoned");
            new_sectors
                .iter()
                .map(|sw| guard.embed_text(&content).map(|v| (sw.sector, v)))
                .collect::<OpenMemoryResult<Vec<_>>>()?
        };
        for (sector, vector) in &vectors {
            self.vectors.upsert(id, *sector, vector)?;
        }
        for dropped in old_sectors.iter().filter(|s| !new_sector_set.contains(s)) {
            self.vectors.delete(id, *dropped)?;
        }

        memory.primary_sector = primary_sector;
        memory.sectors = new_sectors;
        memory.simhash = new_simhash;
        memory.mean_vec = vectors.first().map(|(_, v)| v.clone());
        memory.metadata.insert(SEARCH_TEXT_KEY.to_string(), serde_json::Value::String(content.clone()));

        let key = self.content_key(id)?;
        memory.content = openmemory_crypto::seal(&key, content.as_bytes())?;

        self.storage.update(tenant, &memory)?;
        Ok(UpdateOutcome::Updated(Box::new(memory)))
    }

    // ---------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------

    pub fn search(&self, tenant: &TenantScope, query: &str, opts: SearchOptions) -> OpenMemoryResult<Vec<SearchResult>> {
        let k_prime = (opts.limit * self.config.hsg.ann_candidate_multiplier).max(self.config.hsg.ann_candidate_floor);

        let query_vec = {
            let mut guard = self.embeddings.lock().expect("embedding engine poisoned");
            guard.embed_text(query)
        };

        let results = match query_vec {
            Ok(vec) => self.search_by_vector(tenant, query, &vec, &opts, k_prime)?,
            Err(err) => {
                warn!(error = %err, "embedding failed, falling back to keyword-only search");
                self.search_keyword_only(tenant, query, &opts)?
            }
        };

        self.record_coactivations(tenant, &results);
        Ok(results)
    }

    fn search_by_vector(
        &self,
        tenant: &TenantScope,
        query: &str,
        query_vec: &[f32],
        opts: &SearchOptions,
        k_prime: usize,
    ) -> OpenMemoryResult<Vec<SearchResult>> {
        let per_sector: Vec<Vec<_>> =
            opts.sectors.iter().map(|sector| self.vectors.search(tenant, *sector, query_vec, k_prime)).collect::<OpenMemoryResult<Vec<_>>>()?;

        let best_sim = union_best_sim(per_sector);
        let ids: Vec<Uuid> = best_sim.keys().copied().collect();
        let memories = self.storage.get_bulk(tenant, &ids)?;

        let candidates = self.build_candidates(memories, opts, |id| best_sim.get(&id).copied().unwrap_or(0.0));

        let storage = Arc::clone(&self.storage);
        let waypoint_weight = move |from: Uuid, to: Uuid| storage.get_waypoint(from, to).ok().flatten().map(|w| w.weight);

        Ok(self.retrieval.rank(query, &opts.tags, candidates, waypoint_weight, Utc::now(), opts.limit))
    }

    fn search_keyword_only(&self, tenant: &TenantScope, query: &str, opts: &SearchOptions) -> OpenMemoryResult<Vec<SearchResult>> {
        let pool = (opts.limit * self.config.hsg.ann_candidate_multiplier).max(self.config.hsg.ann_candidate_floor);
        let memories = self.storage.search_fts(tenant, query, pool)?;
        let candidates = self.build_candidates(memories, opts, |_| 0.0);
        Ok(self.retrieval.rank_keyword_only(query, candidates, opts.limit))
    }

    fn build_candidates(&self, memories: Vec<Memory>, opts: &SearchOptions, sim_for: impl Fn(Uuid) -> f64) -> Vec<Candidate> {
        memories
            .into_iter()
            .filter(|m| opts.tags.iter().all(|t| m.tags.contains(t)))
            .filter(|m| opts.metadata.iter().all(|(k, v)| m.metadata.get(k) == Some(v)))
            .map(|m| {
                let search_text = m.metadata.get(SEARCH_TEXT_KEY).and_then(|v| v.as_str()).unwrap_or("").to_string();
                let sim = sim_for(m.id);
                Candidate { memory: m, sim, search_text }
            })
            .collect()
    }

    /// Buffers coactivations for the returned set, activation weighted by
    /// the product of the two results' inverse ranks (spec.md §4.3
    /// "Coactivation & waypoint reinforcement").
    fn record_coactivations(&self, tenant: &TenantScope, results: &[SearchResult]) {
        let Some(tenant_id) = tenant.tenant_id() else { return };
        let tenant_uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, tenant_id.as_bytes());

        for i in 0..results.len() {
            for j in (i + 1)..results.len() {
                let activation = 1.0 / ((i + 1) as f64) * (1.0 / ((j + 1) as f64));
                self.waypoints.record_coactivation(&self.coactivation, tenant_uuid, results[i].memory.id, results[j].memory.id, activation);
            }
        }
    }

    // ---------------------------------------------------------------
    // Maintenance
    // ---------------------------------------------------------------

    /// Flushes buffered coactivations into reinforced waypoints, pruning
    /// weak edges in the same pass (spec.md §4.3, §4.7).
    pub fn flush_coactivations(&self) -> OpenMemoryResult<usize> {
        let storage = Arc::clone(&self.storage);
        let lookup = move |_tenant: Uuid, from: Uuid, to: Uuid| storage.get_waypoint(from, to).ok().flatten();
        let reinforced = self.waypoints.reinforce_batch(&self.coactivation, lookup);
        let (kept, _result) = self.waypoints.prune(reinforced);
        let count = kept.len();
        for waypoint in kept {
            self.storage.upsert_waypoint(&waypoint)?;
        }
        Ok(count)
    }

    /// Runs the periodic salience decay sweep over every memory in `tenant`
    /// (spec.md §4.3 "Salience decay & consolidation").
    pub fn run_decay(&self, tenant: &TenantScope) -> OpenMemoryResult<usize> {
        let memories = self.storage.query_stale(tenant, 1.0)?;
        let now = Utc::now();
        let results = self.decay.process_batch(&memories, now);
        for (memory, (_, salience, _)) in memories.iter().zip(results.iter()) {
            let mut updated = memory.clone();
            updated.salience = *salience;
            self.storage.update(tenant, &updated)?;
        }
        Ok(results.len())
    }

    /// Collects cold, waypoint-orphaned memories and consolidates any
    /// tight clusters into new "slow" summary memories, deleting the
    /// originals (spec.md §4.3 "Salience decay & consolidation").
    pub fn run_consolidation(&self, tenant: &TenantScope) -> OpenMemoryResult<Vec<Uuid>> {
        let cold = self.storage.query_stale(tenant, self.decay.archival_salience_threshold())?;
        let mut candidates = Vec::with_capacity(cold.len());
        for memory in cold {
            let inbound = !self.storage.waypoints_into(&[memory.id])?.is_empty();
            let essence = self.decrypt_content(&memory).unwrap_or_default();
            candidates.push(ColdCandidate { memory, essence, has_inbound_waypoint: inbound });
        }

        let plans = self.consolidation.plan(candidates)?;
        let mut created = Vec::with_capacity(plans.len());

        for plan in plans {
            let outcome = self.add(
                tenant,
                &plan.owner_user_id,
                &plan.summary_content,
                AddOptions { tags: Vec::new(), metadata: HashMap::new() },
            )?;
            for absorbed in plan.absorbed_ids {
                self.delete(tenant, absorbed)?;
            }
            created.push(outcome.id);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::config::EmbeddingConfig;
    use openmemory_vector::SqliteVectorStore;

    fn test_engine() -> HsgEngine {
        let dims = 32;
        let config = OpenMemoryConfig {
            embeddings: EmbeddingConfig { provider: "tfidf".to_string(), dimensions: dims, ..Default::default() },
            ..Default::default()
        };
        let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
        let vectors: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::open_in_memory(dims).unwrap());
        let embeddings = EmbeddingEngine::new(config.embeddings.clone());
        HsgEngine::new(storage, vectors, embeddings, config, [1u8; 32], None)
    }

    #[test]
    fn add_then_get_round_trips_through_encryption() {
        let engine = test_engine();
        let tenant = TenantScope::of("acme");
        let outcome = engine.add(&tenant, "user-1", "the quick brown fox", AddOptions::default()).unwrap();
        assert!(outcome.duplicate_of.is_none());

        let stored = engine.get(&tenant, outcome.id).unwrap().unwrap();
        assert_ne!(stored.content, "the quick brown fox");
        assert_eq!(engine.decrypt_content(&stored).unwrap(), "the quick brown fox");
    }

    #[test]
    fn adding_the_same_content_twice_reinforces_instead_of_duplicating() {
        let engine = test_engine();
        let tenant = TenantScope::of("acme");
        let first = engine.add(&tenant, "user-1", "remember to water the plants", AddOptions::default()).unwrap();
        let second = engine.add(&tenant, "user-1", "remember to water the plants", AddOptions::default()).unwrap();
        assert_eq!(second.duplicate_of, Some(first.id));
        assert_eq!(second.id, first.id);
    }

    #[test]
    fn search_finds_an_added_memory() {
        let engine = test_engine();
        let tenant = TenantScope::of("acme");
        engine.add(&tenant, "user-1", "the quick brown fox jumps over the lazy dog", AddOptions::default()).unwrap();

        let results = engine.search(&tenant, "quick brown fox", SearchOptions::default()).unwrap();
        assert!(!results.is_empty());
    }

    #[test]
    fn delete_removes_the_memory() {
        let engine = test_engine();
        let tenant = TenantScope::of("acme");
        let outcome = engine.add(&tenant, "user-1", "a fact worth deleting", AddOptions::default()).unwrap();
        assert!(engine.delete(&tenant, outcome.id).unwrap());
        assert!(engine.get(&tenant, outcome.id).unwrap().is_none());
        assert!(!engine.delete(&tenant, outcome.id).unwrap());
    }

    #[test]
    fn update_replacing_content_reclassifies_and_reembeds() {
        let engine = test_engine();
        let tenant = TenantScope::of("acme");
        let outcome = engine.add(&tenant, "user-1", "original content here", AddOptions::default()).unwrap();

        let updated = engine
            .update(&tenant, outcome.id, UpdateOptions { content: Some("entirely different content".to_string()), ..Default::default() })
            .unwrap();
        match updated {
            UpdateOutcome::Updated(memory) => {
                assert_eq!(engine.decrypt_content(&memory).unwrap(), "entirely different content");
            }
            UpdateOutcome::Conflict { .. } => panic!("unexpected conflict"),
        }
    }
}
