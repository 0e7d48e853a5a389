use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use openmemory_core::memory::Sector;

/// A memory as handed back to callers: `content` is plaintext, decrypted
/// through the facade (spec.md §4.2 — `Memory.content` itself never is).
#[derive(Debug, Clone)]
pub struct MemoryView {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    pub primary_sector: Sector,
    pub tags: Vec<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub salience: f64,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub access_count: u64,
}
