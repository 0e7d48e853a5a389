/// Metadata store errors (SQLite-backed).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("connection pool exhausted: {active_connections} active connections")]
    PoolExhausted { active_connections: usize },

    #[error("tenant query rewrite failed: {reason}")]
    RewriteFailed { reason: String },
}
