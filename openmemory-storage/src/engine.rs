//! StorageEngine — owns the connection pool, implements `MetadataStore`,
//! runs migrations on open.

use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use openmemory_core::errors::OpenMemoryResult;
use openmemory_core::memory::{Memory, Sector, TemporalEdge, TemporalFact, TenantScope, Waypoint};
use openmemory_core::traits::MetadataStore;

use crate::audit::{AuditActor, AuditLogger, AuditOperation};
use crate::migrations;
use crate::pool::ConnectionPool;

pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed stores read through the read pool; the in-memory test
    /// engine routes reads through the writer since its read-pool
    /// connections are isolated databases that can't see the writer's rows.
    use_read_pool: bool,
}

impl StorageEngine {
    pub fn open(path: &Path, read_pool_size: usize) -> OpenMemoryResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self { pool, use_read_pool: true };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory() -> OpenMemoryResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self { pool, use_read_pool: false };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| migrations::run_migrations(conn))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> OpenMemoryResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> OpenMemoryResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

/// Waypoint and temporal persistence. These live outside `MetadataStore`
/// because no alternate backend in this system implements them — the
/// trait stays scoped to what's genuinely swappable.
impl StorageEngine {
    pub fn get_waypoint(&self, from: Uuid, to: Uuid) -> OpenMemoryResult<Option<Waypoint>> {
        self.with_reader(|conn| crate::queries::waypoint_crud::get(conn, from, to))
    }

    pub fn upsert_waypoint(&self, waypoint: &Waypoint) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::waypoint_crud::upsert(conn, waypoint))
    }

    pub fn delete_waypoints_touching(&self, memory_id: Uuid) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::waypoint_crud::delete_all_touching(conn, memory_id))
    }

    pub fn delete_waypoint(&self, from: Uuid, to: Uuid) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::waypoint_crud::delete(conn, from, to))
    }

    pub fn all_waypoints(&self) -> OpenMemoryResult<Vec<Waypoint>> {
        self.with_reader(crate::queries::waypoint_crud::all)
    }

    pub fn waypoints_into(&self, targets: &[Uuid]) -> OpenMemoryResult<Vec<Waypoint>> {
        self.with_reader(|conn| crate::queries::waypoint_crud::edges_into(conn, targets))
    }

    pub fn insert_fact(&self, tenant: &TenantScope, fact: &TemporalFact) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::temporal_crud::insert_fact(conn, tenant, fact))
    }

    pub fn update_fact(&self, tenant: &TenantScope, fact: &TemporalFact) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::temporal_crud::update_fact(conn, tenant, fact))
    }

    pub fn active_fact(&self, tenant: &TenantScope, user_id: &str, subject: &str, predicate: &str) -> OpenMemoryResult<Option<TemporalFact>> {
        self.with_reader(|conn| crate::queries::temporal_crud::active_fact(conn, tenant, user_id, subject, predicate))
    }

    pub fn fact_by_id(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<TemporalFact>> {
        self.with_reader(|conn| crate::queries::temporal_crud::fact_by_id(conn, tenant, id))
    }

    pub fn facts_for_subject(&self, tenant: &TenantScope, user_id: &str, subject: &str) -> OpenMemoryResult<Vec<TemporalFact>> {
        self.with_reader(|conn| crate::queries::temporal_crud::facts_for_subject(conn, tenant, user_id, subject))
    }

    pub fn all_active_facts(&self, tenant: &TenantScope) -> OpenMemoryResult<Vec<TemporalFact>> {
        self.with_reader(|conn| crate::queries::temporal_crud::all_active_facts(conn, tenant))
    }

    pub fn insert_edge(&self, tenant: &TenantScope, edge: &TemporalEdge) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::temporal_crud::insert_edge(conn, tenant, edge))
    }

    pub fn update_edge(&self, tenant: &TenantScope, edge: &TemporalEdge) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| crate::queries::temporal_crud::update_edge(conn, tenant, edge))
    }

    pub fn active_edge(&self, tenant: &TenantScope, user_id: &str, from_entity: &str, relation: &str, to_entity: &str) -> OpenMemoryResult<Option<TemporalEdge>> {
        self.with_reader(|conn| crate::queries::temporal_crud::active_edge(conn, tenant, user_id, from_entity, relation, to_entity))
    }

    pub fn edge_by_id(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<TemporalEdge>> {
        self.with_reader(|conn| crate::queries::temporal_crud::edge_by_id(conn, tenant, id))
    }

    pub fn edges_for_entity(&self, tenant: &TenantScope, user_id: &str, entity: &str) -> OpenMemoryResult<Vec<TemporalEdge>> {
        self.with_reader(|conn| crate::queries::temporal_crud::edges_for_entity(conn, tenant, user_id, entity))
    }
}

impl MetadataStore for StorageEngine {
    fn create(&self, tenant: &TenantScope, memory: &Memory) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| {
            crate::queries::memory_crud::insert_memory(conn, tenant, memory)?;
            AuditLogger::log(conn, memory.id, tenant, AuditOperation::Create, AuditActor::System, serde_json::json!({}))?;
            Ok(())
        })
    }

    fn get(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<Memory>> {
        self.with_reader(|conn| crate::queries::memory_crud::get_memory(conn, tenant, id))
    }

    fn update(&self, tenant: &TenantScope, memory: &Memory) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| {
            crate::queries::memory_crud::update_memory(conn, tenant, memory)?;
            AuditLogger::log(conn, memory.id, tenant, AuditOperation::Update, AuditActor::System, serde_json::json!({}))?;
            Ok(())
        })
    }

    fn delete(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(|conn| {
            crate::queries::memory_crud::delete_memory(conn, tenant, id)?;
            AuditLogger::log(conn, id, tenant, AuditOperation::Delete, AuditActor::System, serde_json::json!({}))?;
            Ok(())
        })
    }

    fn create_bulk(&self, tenant: &TenantScope, memories: &[Memory]) -> OpenMemoryResult<usize> {
        self.pool.writer.with_conn(|conn| crate::queries::memory_crud::bulk_insert(conn, tenant, memories))
    }

    fn get_bulk(&self, tenant: &TenantScope, ids: &[Uuid]) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| crate::queries::memory_crud::bulk_get(conn, tenant, ids))
    }

    fn query_by_sector(&self, tenant: &TenantScope, sector: Sector) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| crate::queries::memory_query::query_by_sector(conn, tenant, sector))
    }

    fn query_by_tags(&self, tenant: &TenantScope, tags: &[String]) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| crate::queries::memory_query::query_by_tags(conn, tenant, tags))
    }

    fn query_by_date_range(
        &self,
        tenant: &TenantScope,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| crate::queries::memory_query::query_by_date_range(conn, tenant, from, to))
    }

    fn query_stale(&self, tenant: &TenantScope, salience_below: f64) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| crate::queries::memory_query::query_stale(conn, tenant, salience_below))
    }

    fn search_fts(&self, tenant: &TenantScope, query: &str, limit: usize) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| crate::queries::memory_query::search_fts(conn, tenant, query, limit))
    }

    fn find_by_simhash_neighborhood(
        &self,
        tenant: &TenantScope,
        simhash: u64,
        hamming_distance: u32,
    ) -> OpenMemoryResult<Vec<Memory>> {
        self.with_reader(|conn| {
            crate::queries::memory_query::find_by_simhash_neighborhood(conn, tenant, simhash, hamming_distance)
        })
    }

    fn count_by_sector(&self, tenant: &TenantScope) -> OpenMemoryResult<Vec<(Sector, usize)>> {
        self.with_reader(|conn| crate::queries::memory_query::count_by_sector(conn, tenant))
    }

    fn average_salience(&self, tenant: &TenantScope) -> OpenMemoryResult<f64> {
        self.with_reader(|conn| crate::queries::memory_query::average_salience(conn, tenant))
    }

    fn vacuum(&self) -> OpenMemoryResult<()> {
        self.pool.writer.with_conn(crate::maintenance::full_vacuum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::Memory;

    #[test]
    fn roundtrip_through_the_engine() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let tenant = TenantScope::of("acme");
        let memory = Memory::new("user-1", "v1:ZmFrZQ==", Sector::Semantic);

        engine.create(&tenant, &memory).unwrap();
        let fetched = engine.get(&tenant, memory.id).unwrap().unwrap();
        assert_eq!(fetched.user_id, "user-1");

        engine.delete(&tenant, memory.id).unwrap();
        assert!(engine.get(&tenant, memory.id).unwrap().is_none());
    }
}
