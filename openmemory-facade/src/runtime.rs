//! OpenMemory — the runtime that owns every engine and publishes the
//! library surface (spec.md §6). Analogous to a long-lived service handle:
//! construct one per process (or per test), then call its methods.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use uuid::Uuid;

use openmemory_core::config::OpenMemoryConfig;
use openmemory_core::memory::{Memory, TenantScope};
use openmemory_core::traits::{LockManager, VectorStore};
use openmemory_core::{OpenMemoryError, OpenMemoryResult};
use openmemory_embeddings::EmbeddingEngine;
use openmemory_hsg::{AddOptions, AddOutcome, HsgEngine, SearchOptions, SearchResult, UpdateOptions, UpdateOutcome};
use openmemory_lock::{InMemoryLockManager, RedisLockManager, SqlLockManager};
use openmemory_scheduler::Scheduler;
use openmemory_storage::StorageEngine;
use openmemory_temporal::TemporalEngine;
use openmemory_vector::SqliteVectorStore;

use crate::maintenance;
use crate::options::{LockBackend, OpenMemoryOptions};
use crate::view::MemoryView;

/// Owns the metadata store, vector store, HSG engine, temporal engine,
/// lock manager and maintenance scheduler for one OpenMemory instance.
/// `hsg` and `temporal` are `Arc`-wrapped so the maintenance tasks
/// registered at construction can hold their own handle without borrowing
/// back through `OpenMemory` itself.
pub struct OpenMemory {
    pub(crate) storage: Arc<StorageEngine>,
    pub(crate) hsg: Arc<HsgEngine>,
    pub(crate) temporal: Arc<TemporalEngine>,
    pub(crate) lock: Arc<dyn LockManager>,
    pub(crate) scheduler: Arc<Scheduler>,
    pub(crate) config: OpenMemoryConfig,
}

impl OpenMemory {
    /// Builds every engine and registers the default maintenance tasks.
    /// Tasks are registered but not started — call `spawn_maintenance` (or
    /// drive them yourself via `run_maintenance_task`) once the runtime is
    /// ready to go live.
    pub fn open(opts: OpenMemoryOptions) -> OpenMemoryResult<Self> {
        let config = opts.config;

        let storage = match &opts.db_path {
            Some(path) => Arc::new(StorageEngine::open(path, config.storage.read_pool_size)?),
            None => Arc::new(StorageEngine::open_in_memory()?),
        };

        let dimensions = config.embeddings.dimensions;
        let vectors: Arc<dyn VectorStore> = match opts.vector_db_path.as_ref().or(opts.db_path.as_ref()) {
            Some(path) => Arc::new(SqliteVectorStore::open(path, dimensions)?),
            None => Arc::new(SqliteVectorStore::open_in_memory(dimensions)?),
        };

        let embeddings = EmbeddingEngine::new(config.embeddings.clone());
        let hsg = Arc::new(HsgEngine::new(
            Arc::clone(&storage),
            Arc::clone(&vectors),
            embeddings,
            config.clone(),
            opts.master_key,
            opts.secondary_key,
        ));

        let temporal = Arc::new(TemporalEngine::new(config.temporal.clone()));

        let lock: Arc<dyn LockManager> = match opts.lock_backend {
            LockBackend::InMemory => Arc::new(InMemoryLockManager::new()),
            LockBackend::Sql => match &opts.db_path {
                Some(path) => Arc::new(SqlLockManager::open(path)?),
                None => Arc::new(SqlLockManager::open_in_memory()?),
            },
            LockBackend::Redis { url } => Arc::new(RedisLockManager::new(&url)?),
        };

        let mut scheduler = Scheduler::new(Arc::clone(&lock), config.scheduler.clone());
        maintenance::register_default_tasks(
            &mut scheduler,
            Arc::clone(&storage),
            Arc::clone(&hsg),
            Arc::clone(&temporal),
            Arc::clone(&vectors),
            &config,
        );

        Ok(OpenMemory { storage, hsg, temporal, lock, scheduler: Arc::new(scheduler), config })
    }

    // -----------------------------------------------------------------
    // Core memory operations (spec.md §6 "Published (library façade)")
    // -----------------------------------------------------------------

    pub fn add(&self, tenant: &TenantScope, user_id: &str, content: &str, opts: AddOptions) -> OpenMemoryResult<AddOutcome> {
        self.hsg.add(tenant, user_id, content, opts)
    }

    /// Fetches a memory and decrypts its content. Returns `Ok(None)` if no
    /// such memory is visible to `tenant`.
    pub fn get(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<MemoryView>> {
        let Some(memory) = self.hsg.get(tenant, id)? else { return Ok(None) };
        self.to_view(memory).map(Some)
    }

    pub fn update(&self, tenant: &TenantScope, id: Uuid, opts: UpdateOptions) -> OpenMemoryResult<UpdateOutcome> {
        self.hsg.update(tenant, id, opts)
    }

    pub fn delete(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<bool> {
        self.hsg.delete(tenant, id)
    }

    pub fn search(&self, tenant: &TenantScope, query: &str, opts: SearchOptions) -> OpenMemoryResult<Vec<SearchResult>> {
        self.hsg.search(tenant, query, opts)
    }

    pub(crate) fn to_view(&self, memory: Memory) -> OpenMemoryResult<MemoryView> {
        let content = self.hsg.decrypt_content(&memory)?;
        Ok(MemoryView {
            id: memory.id,
            user_id: memory.user_id,
            content,
            primary_sector: memory.primary_sector,
            tags: memory.tags,
            metadata: memory.metadata,
            salience: memory.salience.value(),
            created_at: memory.created_at,
            last_seen_at: memory.last_seen_at,
            access_count: memory.access_count,
        })
    }

    // -----------------------------------------------------------------
    // Maintenance (spec.md §6 "Maintenance triggers", §4.7)
    // -----------------------------------------------------------------

    /// Runs a single named maintenance task immediately, under its lease.
    /// Names match what `register_default_tasks` registered:
    /// `decay`, `consolidation`, `coactivation_flush`, `orphan_vector_prune`,
    /// `waypoint_prune`, `confidence_decay`, `vacuum`.
    pub fn run_maintenance_task(&self, name: &str) -> OpenMemoryResult<()> {
        self.scheduler.run_once(name)
    }

    /// Spawns background tickers for every registered task. Requires a
    /// tokio runtime; the returned handles keep the tickers alive for as
    /// long as they're held.
    pub fn spawn_maintenance(&self) -> Vec<tokio::task::JoinHandle<()>> {
        self.scheduler.spawn_all()
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    pub fn temporal_engine(&self) -> &Arc<TemporalEngine> {
        &self.temporal
    }

    pub fn config(&self) -> &OpenMemoryConfig {
        &self.config
    }

    pub(crate) fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.config.locks.default_ttl_secs)
    }

    /// Serializes `f` against every other caller contending for `key`
    /// (spec.md §5 — temporal inserts against the same `(subject,
    /// predicate, userId)` key must be serialized to preserve the
    /// "one active fact" invariant). Retries on a short backoff rather
    /// than failing immediately, since a held lease is expected to be
    /// brief; gives up with a `TIMEOUT` error past `MAX_LOCK_ATTEMPTS`.
    pub(crate) fn with_key_lock<T>(&self, key: &str, f: impl FnOnce() -> OpenMemoryResult<T>) -> OpenMemoryResult<T> {
        const MAX_ATTEMPTS: u32 = 50;
        const RETRY_DELAY: Duration = Duration::from_millis(20);

        let token = Uuid::new_v4().to_string();
        let ttl = self.lock_ttl();

        let mut lease = None;
        for _ in 0..MAX_ATTEMPTS {
            if let Some(acquired) = self.lock.acquire(key, &token, ttl)? {
                lease = Some(acquired);
                break;
            }
            thread::sleep(RETRY_DELAY);
        }
        let Some(lease) = lease else {
            return Err(OpenMemoryError::timeout(format!("could not acquire lock '{key}'")));
        };

        let result = f();
        self.lock.release(&lease.name, &token)?;
        result
    }
}
