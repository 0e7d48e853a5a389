use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::OpenMemoryResult;
use crate::memory::{Memory, Sector, TenantScope};

/// Full CRUD + bulk + query + bitemporal fact/edge access over the metadata
/// store (spec.md §6). Every method takes an explicit `TenantScope` rather
/// than relying on ambient state, so tenant isolation is enforced at the
/// call site, not the backend.
pub trait MetadataStore: Send + Sync {
    // --- CRUD ---
    fn create(&self, tenant: &TenantScope, memory: &Memory) -> OpenMemoryResult<()>;
    fn get(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<Memory>>;
    fn update(&self, tenant: &TenantScope, memory: &Memory) -> OpenMemoryResult<()>;
    fn delete(&self, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<()>;

    // --- Bulk ---
    fn create_bulk(&self, tenant: &TenantScope, memories: &[Memory]) -> OpenMemoryResult<usize>;
    fn get_bulk(&self, tenant: &TenantScope, ids: &[Uuid]) -> OpenMemoryResult<Vec<Memory>>;

    // --- Query ---
    fn query_by_sector(&self, tenant: &TenantScope, sector: Sector) -> OpenMemoryResult<Vec<Memory>>;
    fn query_by_tags(&self, tenant: &TenantScope, tags: &[String]) -> OpenMemoryResult<Vec<Memory>>;
    fn query_by_date_range(
        &self,
        tenant: &TenantScope,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> OpenMemoryResult<Vec<Memory>>;
    fn query_stale(&self, tenant: &TenantScope, salience_below: f64) -> OpenMemoryResult<Vec<Memory>>;

    // --- Full-text search ---
    fn search_fts(&self, tenant: &TenantScope, query: &str, limit: usize) -> OpenMemoryResult<Vec<Memory>>;

    // --- Near-duplicate detection ---
    fn find_by_simhash_neighborhood(
        &self,
        tenant: &TenantScope,
        simhash: u64,
        hamming_distance: u32,
    ) -> OpenMemoryResult<Vec<Memory>>;

    // --- Aggregation ---
    fn count_by_sector(&self, tenant: &TenantScope) -> OpenMemoryResult<Vec<(Sector, usize)>>;
    fn average_salience(&self, tenant: &TenantScope) -> OpenMemoryResult<f64>;

    // --- Maintenance ---
    fn vacuum(&self) -> OpenMemoryResult<()>;
}
