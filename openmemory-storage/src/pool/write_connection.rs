//! The single writer connection. SQLite allows exactly one writer at a
//! time; serializing through one `Mutex<Connection>` avoids `SQLITE_BUSY`
//! under WAL instead of retrying around it.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use openmemory_core::errors::OpenMemoryResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> OpenMemoryResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> OpenMemoryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Executes `f` with the writer connection held for the duration.
    pub fn with_conn<F, T>(&self, f: F) -> OpenMemoryResult<T>
    where
        F: FnOnce(&Connection) -> OpenMemoryResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
