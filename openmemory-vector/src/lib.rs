//! # openmemory-vector
//!
//! Sector-partitioned nearest-neighbor vector storage, with a brute-force
//! SQLite backend for local/embedded deployments and a Redis backend for
//! shared, multi-process ones.

pub mod codec;
pub mod redis_backend;
pub mod sqlite_backend;

pub use redis_backend::RedisVectorStore;
pub use sqlite_backend::SqliteVectorStore;
