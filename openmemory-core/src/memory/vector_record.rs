use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sector::Sector;

/// A single embedding stored against `(memory_id, sector)`, since a memory
/// may carry a distinct vector per sector it belongs to (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub memory_id: Uuid,
    pub sector: Sector,
    pub vector: Vec<f32>,
}

impl VectorRecord {
    pub fn new(memory_id: Uuid, sector: Sector, vector: Vec<f32>) -> Self {
        VectorRecord { memory_id, sector, vector }
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// A vector together with its similarity score against a query, as returned
/// by a nearest-neighbor search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredVector {
    pub memory_id: Uuid,
    pub sector: Sector,
    pub score: f64,
}
