//! VACUUM, checkpoint, integrity check, audit log rotation.

use rusqlite::{params, Connection};

use openmemory_core::errors::OpenMemoryResult;

use crate::to_storage_err;

pub fn incremental_vacuum(conn: &Connection, pages: u32) -> OpenMemoryResult<()> {
    conn.execute_batch(&format!("PRAGMA incremental_vacuum({pages})"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn full_vacuum(conn: &Connection) -> OpenMemoryResult<()> {
    conn.execute_batch("VACUUM").map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn wal_checkpoint(conn: &Connection) -> OpenMemoryResult<()> {
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)").map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn integrity_check(conn: &Connection) -> OpenMemoryResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result == "ok")
}

/// Deletes audit entries older than `months`. Unlike the memory table
/// itself, the audit log has no tenant-visible reads, so this runs
/// unscoped across every tenant.
pub fn rotate_audit_log(conn: &Connection, months: u32) -> OpenMemoryResult<usize> {
    let deleted = conn
        .execute(
            "DELETE FROM memory_audit_log WHERE julianday('now') - julianday(timestamp) > ?1",
            params![months as f64 * 30.0],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted)
}
