//! # openmemory-storage
//!
//! SQLite-backed metadata store: connection pooling, schema migrations,
//! tenant-scoped queries, and the audit log.

pub mod audit;
pub mod engine;
pub mod maintenance;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use openmemory_core::errors::{OpenMemoryError, StorageError};

pub(crate) fn to_storage_err(message: impl Into<String>) -> OpenMemoryError {
    OpenMemoryError::from(StorageError::Sqlite { message: message.into() })
}
