//! Insert, update, get, delete, bulk ops for memories.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use openmemory_core::errors::{OpenMemoryResult, StorageError};
use openmemory_core::memory::{Memory, Salience, Sector, SectorWeight, TenantScope};

use crate::to_storage_err;

use super::tenant_rewrite::tenant_clause;

/// Insert a single memory. Wrapped in a transaction so the row and its
/// audit entry are all-or-nothing (the audit insert happens in the caller,
/// inside the same connection, since `rusqlite::Transaction` derefs to
/// `Connection`).
pub fn insert_memory(conn: &Connection, tenant: &TenantScope, memory: &Memory) -> OpenMemoryResult<()> {
    let sectors_json = serde_json::to_string(&memory.sectors).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json = serde_json::to_string(&memory.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json = serde_json::to_string(&memory.metadata).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO memories (
            id, tenant_id, user_id, content, search_text, primary_sector, sectors_json,
            tags_json, metadata_json, salience, simhash, created_at, last_seen_at,
            access_count, mean_vec, compressed_vec
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            memory.id.to_string(),
            tenant.tenant_id(),
            memory.user_id,
            memory.content,
            search_text_for(memory),
            memory.primary_sector.as_str(),
            sectors_json,
            tags_json,
            metadata_json,
            memory.salience.value(),
            memory.simhash as i64,
            memory.created_at.to_rfc3339(),
            memory.last_seen_at.to_rfc3339(),
            memory.access_count as i64,
            memory.mean_vec.as_ref().map(|v| encode_vec(v)),
            memory.compressed_vec.as_ref().map(|v| encode_vec(v)),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

/// Plaintext search tokens are taken from `metadata["search_text"]` when the
/// caller supplies one (the facade stores it there before sealing
/// `content`); otherwise FTS simply has nothing to match for this memory.
fn search_text_for(memory: &Memory) -> String {
    memory
        .metadata
        .get("search_text")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn encode_vec(v: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(v.len() * 4);
    for f in v {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes
}

fn decode_vec(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()
}

pub fn get_memory(conn: &Connection, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<Memory>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, content, primary_sector, sectors_json, tags_json, metadata_json,
                salience, simhash, created_at, last_seen_at, access_count, mean_vec, compressed_vec
         FROM memories WHERE id = ?1 {clause}"
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let row = if let Some(p) = param {
        stmt.query_row(params![id.to_string(), p], row_to_memory).optional()
    } else {
        stmt.query_row(params![id.to_string()], row_to_memory).optional()
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    row.transpose()
}

pub fn update_memory(conn: &Connection, tenant: &TenantScope, memory: &Memory) -> OpenMemoryResult<()> {
    let sectors_json = serde_json::to_string(&memory.sectors).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json = serde_json::to_string(&memory.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json = serde_json::to_string(&memory.metadata).map_err(|e| to_storage_err(e.to_string()))?;
    let (clause, param) = tenant_clause(tenant);

    let sql = format!(
        "UPDATE memories SET
            content = ?2, search_text = ?3, primary_sector = ?4, sectors_json = ?5,
            tags_json = ?6, metadata_json = ?7, salience = ?8, simhash = ?9,
            last_seen_at = ?10, access_count = ?11, mean_vec = ?12, compressed_vec = ?13
         WHERE id = ?1 {clause}"
    );

    let rows = if let Some(p) = param {
        conn.execute(
            &sql,
            params![
                memory.id.to_string(),
                memory.content,
                search_text_for(memory),
                memory.primary_sector.as_str(),
                sectors_json,
                tags_json,
                metadata_json,
                memory.salience.value(),
                memory.simhash as i64,
                memory.last_seen_at.to_rfc3339(),
                memory.access_count as i64,
                memory.mean_vec.as_ref().map(|v| encode_vec(v)),
                memory.compressed_vec.as_ref().map(|v| encode_vec(v)),
                p,
            ],
        )
    } else {
        conn.execute(
            &sql,
            params![
                memory.id.to_string(),
                memory.content,
                search_text_for(memory),
                memory.primary_sector.as_str(),
                sectors_json,
                tags_json,
                metadata_json,
                memory.salience.value(),
                memory.simhash as i64,
                memory.last_seen_at.to_rfc3339(),
                memory.access_count as i64,
                memory.mean_vec.as_ref().map(|v| encode_vec(v)),
                memory.compressed_vec.as_ref().map(|v| encode_vec(v)),
            ],
        )
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(StorageError::Sqlite { message: format!("no memory {} visible to this tenant", memory.id) }.into());
    }
    Ok(())
}

pub fn delete_memory(conn: &Connection, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<()> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!("DELETE FROM memories WHERE id = ?1 {clause}");
    if let Some(p) = param {
        conn.execute(&sql, params![id.to_string(), p])
    } else {
        conn.execute(&sql, params![id.to_string()])
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Bulk insert, wrapped in a single transaction for throughput.
pub fn bulk_insert(conn: &Connection, tenant: &TenantScope, memories: &[Memory]) -> OpenMemoryResult<usize> {
    if memories.is_empty() {
        return Ok(0);
    }
    conn.execute_batch("BEGIN IMMEDIATE").map_err(|e| to_storage_err(e.to_string()))?;

    let mut count = 0;
    for memory in memories {
        if let Err(e) = insert_memory(conn, tenant, memory) {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }
        count += 1;
    }

    conn.execute_batch("COMMIT").map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count)
}

pub fn bulk_get(conn: &Connection, tenant: &TenantScope, ids: &[Uuid]) -> OpenMemoryResult<Vec<Memory>> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(memory) = get_memory(conn, tenant, *id)? {
            results.push(memory);
        }
    }
    Ok(results)
}

fn row_to_memory(row: &rusqlite::Row<'_>) -> rusqlite::Result<OpenMemoryResult<Memory>> {
    Ok(try_row_to_memory(row))
}

fn try_row_to_memory(row: &rusqlite::Row<'_>) -> OpenMemoryResult<Memory> {
    let id_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let primary_sector_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let sectors_json: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let last_seen_at_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;
    let mean_vec_bytes: Option<Vec<u8>> = row.get(12).map_err(|e| to_storage_err(e.to_string()))?;
    let compressed_vec_bytes: Option<Vec<u8>> = row.get(13).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> OpenMemoryResult<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(Memory {
        id: Uuid::parse_str(&id_str).map_err(|e| to_storage_err(e.to_string()))?,
        user_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        content: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        primary_sector: primary_sector_str.parse::<Sector>().map_err(|e| to_storage_err(e))?,
        sectors: serde_json::from_str::<Vec<SectorWeight>>(&sectors_json).map_err(|e| to_storage_err(e.to_string()))?,
        tags: serde_json::from_str(&tags_json).map_err(|e| to_storage_err(e.to_string()))?,
        metadata: serde_json::from_str(&metadata_json).map_err(|e| to_storage_err(e.to_string()))?,
        salience: Salience::new(row.get(7).map_err(|e| to_storage_err(e.to_string()))?),
        simhash: row.get::<_, i64>(8).map_err(|e| to_storage_err(e.to_string()))? as u64,
        created_at: parse_dt(&created_at_str)?,
        last_seen_at: parse_dt(&last_seen_at_str)?,
        access_count: row.get::<_, i64>(11).map_err(|e| to_storage_err(e.to_string()))? as u64,
        mean_vec: mean_vec_bytes.as_deref().map(decode_vec),
        compressed_vec: compressed_vec_bytes.as_deref().map(decode_vec),
    })
}

pub(crate) use self::row_to_memory as parse_memory_row;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_then_get_round_trips() {
        let conn = test_conn();
        let tenant = TenantScope::of("acme");
        let memory = Memory::new("user-1", "v1:ZmFrZQ==", Sector::Episodic);
        insert_memory(&conn, &tenant, &memory).unwrap();

        let fetched = get_memory(&conn, &tenant, memory.id).unwrap().unwrap();
        assert_eq!(fetched.id, memory.id);
        assert_eq!(fetched.primary_sector, Sector::Episodic);
    }

    #[test]
    fn other_tenant_cannot_see_memory() {
        let conn = test_conn();
        let memory = Memory::new("user-1", "v1:ZmFrZQ==", Sector::Semantic);
        insert_memory(&conn, &TenantScope::of("acme"), &memory).unwrap();

        let fetched = get_memory(&conn, &TenantScope::of("other"), memory.id).unwrap();
        assert!(fetched.is_none());
    }

    #[test]
    fn delete_removes_row() {
        let conn = test_conn();
        let tenant = TenantScope::of("acme");
        let memory = Memory::new("user-1", "v1:ZmFrZQ==", Sector::Procedural);
        insert_memory(&conn, &tenant, &memory).unwrap();
        delete_memory(&conn, &tenant, memory.id).unwrap();
        assert!(get_memory(&conn, &tenant, memory.id).unwrap().is_none());
    }
}
