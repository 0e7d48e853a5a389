use uuid::Uuid;

use crate::errors::OpenMemoryResult;
use crate::memory::{ScoredVector, Sector, TenantScope};

/// Sector-partitioned nearest-neighbor vector storage (spec.md §4.2).
pub trait VectorStore: Send + Sync {
    fn upsert(&self, memory_id: Uuid, sector: Sector, vector: &[f32]) -> OpenMemoryResult<()>;
    fn get(&self, memory_id: Uuid, sector: Sector) -> OpenMemoryResult<Option<Vec<f32>>>;
    fn delete(&self, memory_id: Uuid, sector: Sector) -> OpenMemoryResult<()>;
    fn delete_all_sectors(&self, memory_id: Uuid) -> OpenMemoryResult<()>;

    /// Nearest neighbors to `query` within `sector`, scoped to `tenant`.
    fn search(
        &self,
        tenant: &TenantScope,
        sector: Sector,
        query: &[f32],
        limit: usize,
    ) -> OpenMemoryResult<Vec<ScoredVector>>;

    /// Every distinct memory id currently holding at least one vector,
    /// across all sectors and tenants. Backs orphan-vector pruning
    /// (spec.md §4.8), which needs the full id set to diff against the
    /// metadata store.
    fn all_memory_ids(&self) -> OpenMemoryResult<Vec<Uuid>>;

    fn dimensions(&self) -> usize;
}
