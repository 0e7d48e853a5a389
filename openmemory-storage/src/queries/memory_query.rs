//! Query and search paths: sector/tag/date/staleness filters, full-text
//! search, simhash neighborhood lookup, and aggregation.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use openmemory_core::errors::OpenMemoryResult;
use openmemory_core::memory::{Memory, Sector, TenantScope};

use crate::to_storage_err;

use super::memory_crud::parse_memory_row;
use super::tenant_rewrite::tenant_clause;

const SELECT_COLUMNS: &str = "id, user_id, content, primary_sector, sectors_json, tags_json, metadata_json,
    salience, simhash, created_at, last_seen_at, access_count, mean_vec, compressed_vec";

fn collect_rows(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> OpenMemoryResult<Vec<Memory>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, parse_memory_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

pub fn query_by_sector(conn: &Connection, tenant: &TenantScope, sector: Sector) -> OpenMemoryResult<Vec<Memory>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories WHERE primary_sector = ?1 {clause}");
    match param {
        Some(p) => collect_rows(conn, &sql, params![sector.as_str(), p]),
        None => collect_rows(conn, &sql, params![sector.as_str()]),
    }
}

pub fn query_by_tags(conn: &Connection, tenant: &TenantScope, tags: &[String]) -> OpenMemoryResult<Vec<Memory>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories WHERE 1=1 {clause}");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = if let Some(p) = param {
        stmt.query_map(params![p], parse_memory_row)
    } else {
        stmt.query_map([], parse_memory_row)
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let memory = row.map_err(|e| to_storage_err(e.to_string()))??;
        if tags.iter().any(|t| memory.tags.contains(t)) {
            out.push(memory);
        }
    }
    Ok(out)
}

pub fn query_by_date_range(
    conn: &Connection,
    tenant: &TenantScope,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> OpenMemoryResult<Vec<Memory>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM memories WHERE created_at >= ?1 AND created_at <= ?2 {clause}"
    );
    match param {
        Some(p) => collect_rows(conn, &sql, params![from.to_rfc3339(), to.to_rfc3339(), p]),
        None => collect_rows(conn, &sql, params![from.to_rfc3339(), to.to_rfc3339()]),
    }
}

pub fn query_stale(conn: &Connection, tenant: &TenantScope, salience_below: f64) -> OpenMemoryResult<Vec<Memory>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories WHERE salience < ?1 {clause}");
    match param {
        Some(p) => collect_rows(conn, &sql, params![salience_below, p]),
        None => collect_rows(conn, &sql, params![salience_below]),
    }
}

const SEARCH_COLUMNS: &str = "m.id, m.user_id, m.content, m.primary_sector, m.sectors_json, m.tags_json,
    m.metadata_json, m.salience, m.simhash, m.created_at, m.last_seen_at, m.access_count,
    m.mean_vec, m.compressed_vec";

pub fn search_fts(conn: &Connection, tenant: &TenantScope, query: &str, limit: usize) -> OpenMemoryResult<Vec<Memory>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT {SEARCH_COLUMNS} FROM memories m
         JOIN memories_fts fts ON fts.rowid = m.rowid
         WHERE memories_fts MATCH ?1 {clause}
         ORDER BY rank LIMIT ?2"
    );
    match param {
        Some(p) => collect_rows(conn, &sql, params![query, limit as i64, p]),
        None => collect_rows(conn, &sql, params![query, limit as i64]),
    }
}

pub fn find_by_simhash_neighborhood(
    conn: &Connection,
    tenant: &TenantScope,
    simhash: u64,
    hamming_distance: u32,
) -> OpenMemoryResult<Vec<Memory>> {
    // SQLite has no native popcount, so pull the tenant's candidates and
    // filter in Rust; fine at the scale this store targets (a single
    // tenant's working set, not a web-scale corpus).
    let (clause, param) = tenant_clause(tenant);
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories WHERE 1=1 {clause}");
    let candidates = match param {
        Some(p) => collect_rows(conn, &sql, params![p]),
        None => collect_rows(conn, &sql, params![]),
    }?;

    Ok(candidates
        .into_iter()
        .filter(|m| (m.simhash ^ simhash).count_ones() <= hamming_distance)
        .collect())
}

pub fn count_by_sector(conn: &Connection, tenant: &TenantScope) -> OpenMemoryResult<Vec<(Sector, usize)>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT primary_sector, COUNT(*) FROM memories WHERE 1=1 {clause} GROUP BY primary_sector"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(String, i64)> {
        Ok((row.get(0)?, row.get(1)?))
    };

    let rows: Vec<(String, i64)> = if let Some(p) = param {
        stmt.query_map(params![p], map_row)
    } else {
        stmt.query_map([], map_row)
    }
    .map_err(|e| to_storage_err(e.to_string()))?
    .collect::<Result<_, _>>()
    .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter()
        .map(|(s, count)| Ok((s.parse::<Sector>().map_err(to_storage_err)?, count as usize)))
        .collect()
}

pub fn average_salience(conn: &Connection, tenant: &TenantScope) -> OpenMemoryResult<f64> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!("SELECT COALESCE(AVG(salience), 0.0) FROM memories WHERE 1=1 {clause}");
    let value = if let Some(p) = param {
        conn.query_row(&sql, params![p], |row| row.get(0))
    } else {
        conn.query_row(&sql, params![], |row| row.get(0))
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(value)
}
