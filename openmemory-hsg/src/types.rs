use std::collections::HashMap;

use uuid::Uuid;

use openmemory_core::memory::Sector;
use openmemory_retrieval::ScoredMemory;

/// Caller-supplied knobs for `add` (spec.md §4.3 "Add").
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub tags: Vec<String>,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Result of `add`: either a freshly created memory, or the id of the
/// existing duplicate that absorbed this call.
#[derive(Debug, Clone, Copy)]
pub struct AddOutcome {
    pub id: Uuid,
    pub duplicate_of: Option<Uuid>,
}

/// Caller-supplied knobs for `search` (spec.md §4.3 "Search").
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub sectors: Vec<Sector>,
    pub tags: Vec<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions { sectors: Sector::ALL.to_vec(), tags: Vec::new(), metadata: HashMap::new(), limit: 10 }
    }
}

pub type SearchResult = ScoredMemory;

/// Caller-supplied knobs for `update`; `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Result of `update`: either the updated memory, or a fingerprint
/// collision with another memory owned by the same tenant (spec.md §4.3
/// "Update") — the caller decides whether to merge.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(Box<openmemory_core::memory::Memory>),
    Conflict { colliding_id: Uuid },
}
