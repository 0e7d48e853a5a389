use redis::{Commands, RedisError};
use uuid::Uuid;

use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult, VectorError};
use openmemory_core::memory::{ScoredVector, Sector, TenantScope};
use openmemory_core::traits::VectorStore;

use crate::codec::{cosine_similarity, decode, encode};

fn to_vector_err(err: RedisError) -> OpenMemoryError {
    OpenMemoryError::from(VectorError::Backend { message: err.to_string() })
}

/// A vector store backed by Redis hashes: one hash per sector, keyed
/// `om:vec:{sector}`, field `memory_id`, value the length-prefixed f32
/// blob from [`crate::codec`]. Tenant isolation is the caller's job —
/// see the note on `search` below.
pub struct RedisVectorStore {
    client: redis::Client,
    dimensions: usize,
}

impl RedisVectorStore {
    pub fn new(redis_url: &str, dimensions: usize) -> OpenMemoryResult<Self> {
        let client = redis::Client::open(redis_url).map_err(to_vector_err)?;
        Ok(Self { client, dimensions })
    }

    fn vectors_key(sector: Sector) -> String {
        format!("om:vec:{}", sector.as_str())
    }

    fn conn(&self) -> OpenMemoryResult<redis::Connection> {
        self.client.get_connection().map_err(to_vector_err)
    }
}

impl VectorStore for RedisVectorStore {
    fn upsert(&self, memory_id: Uuid, sector: Sector, vector: &[f32]) -> OpenMemoryResult<()> {
        if vector.len() != self.dimensions {
            return Err(VectorError::DimensionMismatch { expected: self.dimensions, actual: vector.len() }.into());
        }
        if vector.iter().any(|f| !f.is_finite()) {
            return Err(VectorError::NotFinite.into());
        }

        let mut conn = self.conn()?;
        let id = memory_id.to_string();
        let blob = encode(vector);
        conn.hset::<_, _, _, ()>(Self::vectors_key(sector), &id, blob).map_err(to_vector_err)?;
        Ok(())
    }

    fn get(&self, memory_id: Uuid, sector: Sector) -> OpenMemoryResult<Option<Vec<f32>>> {
        let mut conn = self.conn()?;
        let blob: Option<Vec<u8>> =
            conn.hget(Self::vectors_key(sector), memory_id.to_string()).map_err(to_vector_err)?;
        Ok(blob.and_then(|b| decode(&b)))
    }

    fn delete(&self, memory_id: Uuid, sector: Sector) -> OpenMemoryResult<()> {
        let mut conn = self.conn()?;
        let id = memory_id.to_string();
        conn.hdel::<_, _, ()>(Self::vectors_key(sector), &id).map_err(to_vector_err)?;
        Ok(())
    }

    fn delete_all_sectors(&self, memory_id: Uuid) -> OpenMemoryResult<()> {
        for sector in Sector::ALL {
            self.delete(memory_id, sector)?;
        }
        Ok(())
    }

    /// `tenant` is accepted for interface symmetry but not filtered on —
    /// this store indexes by `(memory_id, sector)` alone. Callers
    /// intersect results against a tenant-scoped metadata lookup before
    /// surfacing them.
    fn search(
        &self,
        _tenant: &TenantScope,
        sector: Sector,
        query: &[f32],
        limit: usize,
    ) -> OpenMemoryResult<Vec<ScoredVector>> {
        if query.len() != self.dimensions {
            return Err(VectorError::DimensionMismatch { expected: self.dimensions, actual: query.len() }.into());
        }

        let mut conn = self.conn()?;
        let all: Vec<(String, Vec<u8>)> = conn.hgetall(Self::vectors_key(sector)).map_err(to_vector_err)?;

        let mut scored: Vec<ScoredVector> = all
            .into_iter()
            .filter_map(|(id, blob)| {
                let vector = decode(&blob)?;
                let score = cosine_similarity(query, &vector);
                Uuid::parse_str(&id).ok().map(|memory_id| ScoredVector { memory_id, sector, score })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    fn all_memory_ids(&self) -> OpenMemoryResult<Vec<Uuid>> {
        let mut conn = self.conn()?;
        let mut seen = std::collections::HashSet::new();
        for sector in Sector::ALL {
            let ids: Vec<String> = conn.hkeys(Self::vectors_key(sector)).map_err(to_vector_err)?;
            seen.extend(ids);
        }
        Ok(seen.into_iter().filter_map(|id| Uuid::parse_str(&id).ok()).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
