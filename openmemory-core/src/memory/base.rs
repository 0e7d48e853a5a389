use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::salience::Salience;
use super::sector::{Sector, SectorWeight};

/// A single unit of stored cognitive memory (spec.md §3).
///
/// `content` holds the encryption envelope produced by `openmemory-crypto`,
/// never plaintext; callers decrypt through the facade, not this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    pub primary_sector: Sector,
    pub sectors: Vec<SectorWeight>,
    pub tags: Vec<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub salience: Salience,
    /// 64-bit FNV-1a simhash fingerprint used for near-duplicate detection.
    pub simhash: u64,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub access_count: u64,
    /// Mean embedding across the memory's sectors, kept for cheap similarity
    /// checks without hitting the vector store.
    pub mean_vec: Option<Vec<f32>>,
    /// Lossy compressed representation retained once a memory has consolidated.
    pub compressed_vec: Option<Vec<f32>>,
}

impl Memory {
    pub fn new(user_id: impl Into<String>, content: impl Into<String>, primary_sector: Sector) -> Self {
        let now = Utc::now();
        Memory {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            content: content.into(),
            primary_sector,
            sectors: vec![SectorWeight { sector: primary_sector, weight: 1.0 }],
            tags: Vec::new(),
            metadata: HashMap::new(),
            salience: Salience::default(),
            simhash: 0,
            created_at: now,
            last_seen_at: now,
            access_count: 0,
            mean_vec: None,
            compressed_vec: None,
        }
    }

    /// Whether this memory carries a non-trivial weight in `sector`.
    pub fn belongs_to(&self, sector: Sector) -> bool {
        self.sectors.iter().any(|sw| sw.sector == sector && sw.weight > 0.0)
    }

    /// Records an access: bumps `access_count` and `last_seen_at`.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_seen_at = Utc::now();
    }

    pub fn weight_in(&self, sector: Sector) -> f64 {
        self.sectors
            .iter()
            .find(|sw| sw.sector == sector)
            .map(|sw| sw.weight)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_memory_has_primary_sector_weight_one() {
        let m = Memory::new("user-1", "ciphertext", Sector::Episodic);
        assert_eq!(m.weight_in(Sector::Episodic), 1.0);
        assert!(m.belongs_to(Sector::Episodic));
        assert!(!m.belongs_to(Sector::Slow));
    }

    #[test]
    fn touch_increments_access_count() {
        let mut m = Memory::new("user-1", "ciphertext", Sector::Semantic);
        assert_eq!(m.access_count, 0);
        m.touch();
        assert_eq!(m.access_count, 1);
    }
}
