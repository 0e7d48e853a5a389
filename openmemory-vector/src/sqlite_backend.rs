use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use uuid::Uuid;

use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult, VectorError};
use openmemory_core::memory::{ScoredVector, Sector, TenantScope};
use openmemory_core::traits::VectorStore;

use crate::codec::{cosine_similarity, decode, encode};

fn to_vector_err(message: impl Into<String>) -> OpenMemoryError {
    OpenMemoryError::from(VectorError::Backend { message: message.into() })
}

/// Brute-force cosine-similarity vector store backed by a single SQLite
/// table. Fine for the corpus sizes a single-tenant memory store holds;
/// real approximate-nearest-neighbor indexing is out of scope here.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    dimensions: usize,
}

impl SqliteVectorStore {
    pub fn open(path: &Path, dimensions: usize) -> OpenMemoryResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_vector_err(e.to_string()))?;
        Self::from_connection(conn, dimensions)
    }

    pub fn open_in_memory(dimensions: usize) -> OpenMemoryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_vector_err(e.to_string()))?;
        Self::from_connection(conn, dimensions)
    }

    fn from_connection(conn: Connection, dimensions: usize) -> OpenMemoryResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS vectors (
                memory_id TEXT NOT NULL,
                sector TEXT NOT NULL,
                vector BLOB NOT NULL,
                PRIMARY KEY (memory_id, sector)
            );
            CREATE INDEX IF NOT EXISTS idx_vectors_sector ON vectors (sector);",
        )
        .map_err(|e| to_vector_err(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn), dimensions })
    }
}

impl VectorStore for SqliteVectorStore {
    fn upsert(&self, memory_id: Uuid, sector: Sector, vector: &[f32]) -> OpenMemoryResult<()> {
        if vector.len() != self.dimensions {
            return Err(VectorError::DimensionMismatch { expected: self.dimensions, actual: vector.len() }.into());
        }
        if vector.iter().any(|f| !f.is_finite()) {
            return Err(VectorError::NotFinite.into());
        }

        let conn = self.conn.lock().map_err(|e| to_vector_err(e.to_string()))?;
        conn.execute(
            "INSERT INTO vectors (memory_id, sector, vector) VALUES (?1, ?2, ?3)
             ON CONFLICT(memory_id, sector) DO UPDATE SET vector = excluded.vector",
            params![memory_id.to_string(), sector.as_str(), encode(vector)],
        )
        .map_err(|e| to_vector_err(e.to_string()))?;
        Ok(())
    }

    fn get(&self, memory_id: Uuid, sector: Sector) -> OpenMemoryResult<Option<Vec<f32>>> {
        let conn = self.conn.lock().map_err(|e| to_vector_err(e.to_string()))?;
        let blob: Option<Vec<u8>> = conn
            .query_row(
                "SELECT vector FROM vectors WHERE memory_id = ?1 AND sector = ?2",
                params![memory_id.to_string(), sector.as_str()],
                |row| row.get(0),
            )
            .optional_()
            .map_err(|e| to_vector_err(e.to_string()))?;
        Ok(blob.and_then(|b| decode(&b)))
    }

    fn delete(&self, memory_id: Uuid, sector: Sector) -> OpenMemoryResult<()> {
        let conn = self.conn.lock().map_err(|e| to_vector_err(e.to_string()))?;
        conn.execute(
            "DELETE FROM vectors WHERE memory_id = ?1 AND sector = ?2",
            params![memory_id.to_string(), sector.as_str()],
        )
        .map_err(|e| to_vector_err(e.to_string()))?;
        Ok(())
    }

    fn delete_all_sectors(&self, memory_id: Uuid) -> OpenMemoryResult<()> {
        let conn = self.conn.lock().map_err(|e| to_vector_err(e.to_string()))?;
        conn.execute("DELETE FROM vectors WHERE memory_id = ?1", params![memory_id.to_string()])
            .map_err(|e| to_vector_err(e.to_string()))?;
        Ok(())
    }

    /// `tenant` is accepted for interface symmetry with the rest of the
    /// storage traits but not filtered on here: this store indexes by
    /// `(memory_id, sector)` alone. Tenant isolation for vector search
    /// happens one layer up, where the caller intersects candidates
    /// against a tenant-scoped metadata lookup before they're surfaced.
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

        let conn = self.conn.lock().map_err(|e| to_vector_err(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT memory_id, vector FROM vectors WHERE sector = ?1")
            .map_err(|e| to_vector_err(e.to_string()))?;

        let rows: Vec<(String, Vec<u8>)> = stmt
            .query_map(params![sector.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| to_vector_err(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| to_vector_err(e.to_string()))?;

        let mut scored: Vec<ScoredVector> = rows
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
        let conn = self.conn.lock().map_err(|e| to_vector_err(e.to_string()))?;
        let mut stmt = conn.prepare("SELECT DISTINCT memory_id FROM vectors").map_err(|e| to_vector_err(e.to_string()))?;
        let ids: Vec<String> =
            stmt.query_map([], |row| row.get(0)).map_err(|e| to_vector_err(e.to_string()))?.collect::<Result<_, _>>().map_err(|e| to_vector_err(e.to_string()))?;
        Ok(ids.into_iter().filter_map(|id| Uuid::parse_str(&id).ok()).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

trait OptionalRow<T> {
    fn optional_(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional_(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_search_finds_nearest() {
        let store = SqliteVectorStore::open_in_memory(3).unwrap();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert(a, Sector::Episodic, &[1.0, 0.0, 0.0]).unwrap();
        store.upsert(b, Sector::Episodic, &[0.0, 1.0, 0.0]).unwrap();

        let results = store.search(&TenantScope::Any, Sector::Episodic, &[1.0, 0.0, 0.0], 10).unwrap();
        assert_eq!(results[0].memory_id, a);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let store = SqliteVectorStore::open_in_memory(3).unwrap();
        let err = store.upsert(Uuid::new_v4(), Sector::Episodic, &[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            OpenMemoryError::Vector(VectorError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn delete_all_sectors_removes_every_entry() {
        let store = SqliteVectorStore::open_in_memory(2).unwrap();
        let id = Uuid::new_v4();
        store.upsert(id, Sector::Episodic, &[1.0, 0.0]).unwrap();
        store.upsert(id, Sector::Semantic, &[0.0, 1.0]).unwrap();
        store.delete_all_sectors(id).unwrap();
        assert!(store.get(id, Sector::Episodic).unwrap().is_none());
        assert!(store.get(id, Sector::Semantic).unwrap().is_none());
    }
}
