//! Schema migrations, applied in order and tracked in `schema_migrations`.

mod v001_memories;
mod v002_fts;
mod v003_waypoints;
mod v004_temporal;
mod v005_audit_log;

use rusqlite::Connection;

use openmemory_core::errors::{OpenMemoryResult, StorageError};

use crate::to_storage_err;

type Migration = (u32, fn(&Connection) -> Result<(), rusqlite::Error>);

fn all_migrations() -> Vec<Migration> {
    vec![
        (1, v001_memories::up),
        (2, v002_fts::up),
        (3, v003_waypoints::up),
        (4, v004_temporal::up),
        (5, v005_audit_log::up),
    ]
}

/// Runs every migration not yet recorded in `schema_migrations`, in order.
pub fn run_migrations(conn: &Connection) -> OpenMemoryResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, up) in all_migrations() {
        let already_applied: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?1)",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| to_storage_err(e.to_string()))?;

        if already_applied {
            continue;
        }

        up(conn).map_err(|e| StorageError::MigrationFailed { version, reason: e.to_string() })?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (?1)", [version])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    Ok(())
}
