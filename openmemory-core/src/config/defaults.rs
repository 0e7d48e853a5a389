//! Literal default values for every tunable in the config tree. Kept in one
//! place so the numbers in SPEC_FULL §A.3 and each `Default` impl agree.

// --- Retrieval / scoring (spec.md §4.3) ---
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.35;
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.20;
pub const DEFAULT_WAYPOINT_WEIGHT: f64 = 0.15;
pub const DEFAULT_RECENCY_WEIGHT: f64 = 0.15;
pub const DEFAULT_TAG_WEIGHT: f64 = 0.05;
pub const DEFAULT_SALIENCE_WEIGHT: f64 = 0.10;
pub const DEFAULT_RRF_K: f64 = 60.0;
pub const DEFAULT_CANDIDATE_POOL_SIZE: usize = 200;
pub const DEFAULT_BM25_K1: f64 = 1.2;
pub const DEFAULT_BM25_B: f64 = 0.75;
pub const DEFAULT_MIN_SCORE: f64 = 0.01;

// --- Decay ---
pub const DEFAULT_DECAY_PROCESSING_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_ARCHIVAL_SALIENCE_THRESHOLD: f64 = 0.05;

// --- Consolidation ---
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.82;
pub const DEFAULT_COLD_MEMORY_AGE_DAYS: u64 = 30;
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 2000;

// --- Temporal ---
pub const DEFAULT_TEMPORAL_REINFORCEMENT_ALPHA: f64 = 0.2;
pub const DEFAULT_TEMPORAL_CONFIDENCE_DECAY_LAMBDA: f64 = 0.01;
pub const DEFAULT_TEMPORAL_CONFIDENCE_FLOOR: f64 = 0.1;

// --- Waypoints ---
pub const DEFAULT_WAYPOINT_PRUNE_THRESHOLD: f64 = 0.05;
pub const DEFAULT_COACTIVATION_REINFORCEMENT_DELTA: f64 = 0.1;

// --- Locks ---
pub const DEFAULT_LOCK_TTL_SECS: u64 = 30;

// --- Scheduler ---
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

// --- Storage ---
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Dedup ---
pub const DEFAULT_SIMHASH_HAMMING_THRESHOLD: u32 = 3;
pub const DEFAULT_DEDUP_SALIENCE_BOOST: f64 = 0.05;

// --- Encryption ---
pub const DEFAULT_HKDF_INFO: &str = "openmemory/content-key/v1";

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "tfidf";
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
