//! SQLite-backed lock manager. Shares the UPSERT-then-check pattern used
//! across the storage crate's write path: a conditional `INSERT ... ON
//! CONFLICT` so acquisition is a single atomic statement rather than a
//! check-then-write race.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult};
use openmemory_core::memory::SystemLock;
use openmemory_core::traits::LockManager;

fn to_lock_err(message: impl Into<String>) -> OpenMemoryError {
    OpenMemoryError::internal(message.into())
}

pub struct SqlLockManager {
    conn: Mutex<Connection>,
}

impl SqlLockManager {
    pub fn open(path: &Path) -> OpenMemoryResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_lock_err(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> OpenMemoryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_lock_err(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> OpenMemoryResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS system_locks (
                name TEXT PRIMARY KEY,
                token TEXT NOT NULL,
                acquired_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );",
        )
        .map_err(|e| to_lock_err(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn parse_dt(s: &str) -> OpenMemoryResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).map_err(|e| to_lock_err(e.to_string()))
    }

    fn row(conn: &Connection, name: &str) -> OpenMemoryResult<Option<SystemLock>> {
        let raw: Option<(String, String, String, String)> = conn
            .query_row(
                "SELECT name, token, acquired_at, expires_at FROM system_locks WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(|e| to_lock_err(e.to_string()))?;

        raw.map(|(name, token, acquired_at, expires_at)| {
            Ok(SystemLock { name, token, acquired_at: Self::parse_dt(&acquired_at)?, expires_at: Self::parse_dt(&expires_at)? })
        })
        .transpose()
    }
}

impl LockManager for SqlLockManager {
    fn acquire(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>> {
        let conn = self.conn.lock().map_err(|e| to_lock_err(e.to_string()))?;
        let now = Utc::now();

        if let Some(existing) = Self::row(&conn, name)? {
            if !existing.is_expired(now) && !existing.owned_by(token) {
                return Ok(None);
            }
        }

        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        conn.execute(
            "INSERT INTO system_locks (name, token, acquired_at, expires_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET token = excluded.token, acquired_at = excluded.acquired_at,
                expires_at = excluded.expires_at",
            params![name, token, now.to_rfc3339(), expires_at.to_rfc3339()],
        )
        .map_err(|e| to_lock_err(e.to_string()))?;

        Ok(Some(SystemLock { name: name.to_string(), token: token.to_string(), acquired_at: now, expires_at }))
    }

    fn release(&self, name: &str, token: &str) -> OpenMemoryResult<bool> {
        let conn = self.conn.lock().map_err(|e| to_lock_err(e.to_string()))?;
        let affected = conn
            .execute("DELETE FROM system_locks WHERE name = ?1 AND token = ?2", params![name, token])
            .map_err(|e| to_lock_err(e.to_string()))?;
        Ok(affected > 0)
    }

    fn renew(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>> {
        let conn = self.conn.lock().map_err(|e| to_lock_err(e.to_string()))?;
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());

        let affected = conn
            .execute(
                "UPDATE system_locks SET expires_at = ?3 WHERE name = ?1 AND token = ?2",
                params![name, token, expires_at.to_rfc3339()],
            )
            .map_err(|e| to_lock_err(e.to_string()))?;

        if affected == 0 {
            return Ok(None);
        }
        Self::row(&conn, name)
    }

    fn is_locked(&self, name: &str) -> OpenMemoryResult<bool> {
        let conn = self.conn.lock().map_err(|e| to_lock_err(e.to_string()))?;
        Ok(Self::row(&conn, name)?.map(|l| !l.is_expired(Utc::now())).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    #[test]
    fn acquire_then_second_caller_is_rejected() {
        let mgr = SqlLockManager::open_in_memory().unwrap();
        assert!(mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap().is_some());
        assert!(mgr.acquire("maintenance", "b", StdDuration::from_secs(30)).unwrap().is_none());
    }

    #[test]
    fn release_requires_matching_token() {
        let mgr = SqlLockManager::open_in_memory().unwrap();
        mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap();
        assert!(!mgr.release("maintenance", "b").unwrap());
        assert!(mgr.release("maintenance", "a").unwrap());
        assert!(!mgr.is_locked("maintenance").unwrap());
    }

    #[test]
    fn expired_lease_can_be_taken_by_another_token() {
        let mgr = SqlLockManager::open_in_memory().unwrap();
        mgr.acquire("maintenance", "a", StdDuration::from_millis(0)).unwrap();
        std::thread::sleep(StdDuration::from_millis(5));
        assert!(mgr.acquire("maintenance", "b", StdDuration::from_secs(30)).unwrap().is_some());
    }
}
