//! # openmemory-lock
//!
//! Distributed, token-owned lease manager used to serialize maintenance
//! work (decay, consolidation, vacuum) across concurrent callers. Three
//! backends share the same `LockManager` trait: in-process, SQLite, and
//! Redis.

pub mod memory_lock;
pub mod redis_lock;
pub mod sql_lock;

pub use memory_lock::InMemoryLockManager;
pub use redis_lock::RedisLockManager;
pub use sql_lock::SqlLockManager;
