use std::path::PathBuf;

use openmemory_core::config::OpenMemoryConfig;

/// Which [`openmemory_core::traits::LockManager`] backend to wire up
/// (spec.md §4.6). Defaults to in-process, which is fine for a single
/// replica but does not coordinate across processes.
#[derive(Debug, Clone, Default)]
pub enum LockBackend {
    #[default]
    InMemory,
    Sql,
    Redis {
        url: String,
    },
}

/// Options for opening an [`crate::OpenMemory`] instance.
pub struct OpenMemoryOptions {
    /// Path to the SQLite metadata database. `None` opens an in-memory store.
    pub db_path: Option<PathBuf>,
    /// Path to the SQLite vector store database. `None` opens in-memory.
    /// Defaults to `db_path` when both are file-backed and this is unset.
    pub vector_db_path: Option<PathBuf>,
    pub config: OpenMemoryConfig,
    /// Master key content is encrypted under (spec.md §4.2). Callers own
    /// key management; this is not generated or persisted here.
    pub master_key: [u8; 32],
    /// Previous master key still accepted during a rotation window.
    pub secondary_key: Option<[u8; 32]>,
    pub lock_backend: LockBackend,
}

impl Default for OpenMemoryOptions {
    fn default() -> Self {
        OpenMemoryOptions {
            db_path: None,
            vector_db_path: None,
            config: OpenMemoryConfig::default(),
            master_key: [0u8; 32],
            secondary_key: None,
            lock_backend: LockBackend::default(),
        }
    }
}
