//! Persistence for bitemporal facts and edges (spec.md §4.5). Tenant
//! scoping mirrors `memory_crud`: a `tenant_id` column enforced through
//! `tenant_clause`, independent of `user_id` which is carried along purely
//! as fact/edge provenance.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use openmemory_core::errors::OpenMemoryResult;
use openmemory_core::memory::{TemporalEdge, TemporalFact, TenantScope};

use crate::to_storage_err;

use super::tenant_rewrite::tenant_clause;

pub fn insert_fact(conn: &Connection, tenant: &TenantScope, fact: &TemporalFact) -> OpenMemoryResult<()> {
    let metadata_json = serde_json::to_string(&fact.metadata).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO temporal_facts (
            id, tenant_id, user_id, subject, predicate, object, confidence,
            valid_from, valid_to, metadata_json, last_updated, superseded_by
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            fact.id.to_string(),
            tenant.tenant_id(),
            fact.user_id,
            fact.subject,
            fact.predicate,
            fact.object,
            fact.confidence,
            fact.valid_from.to_rfc3339(),
            fact.valid_to.map(|t| t.to_rfc3339()),
            metadata_json,
            fact.last_updated.to_rfc3339(),
            fact.superseded_by.map(|id| id.to_string()),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Updates an existing fact row in place (reinforcement, close, decay).
pub fn update_fact(conn: &Connection, tenant: &TenantScope, fact: &TemporalFact) -> OpenMemoryResult<()> {
    let metadata_json = serde_json::to_string(&fact.metadata).map_err(|e| to_storage_err(e.to_string()))?;
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "UPDATE temporal_facts SET
            confidence = ?2, valid_to = ?3, metadata_json = ?4, last_updated = ?5, superseded_by = ?6
         WHERE id = ?1 {clause}"
    );
    let rows = if let Some(p) = param {
        conn.execute(
            &sql,
            params![
                fact.id.to_string(),
                fact.confidence,
                fact.valid_to.map(|t| t.to_rfc3339()),
                metadata_json,
                fact.last_updated.to_rfc3339(),
                fact.superseded_by.map(|id| id.to_string()),
                p,
            ],
        )
    } else {
        conn.execute(
            &sql,
            params![
                fact.id.to_string(),
                fact.confidence,
                fact.valid_to.map(|t| t.to_rfc3339()),
                metadata_json,
                fact.last_updated.to_rfc3339(),
                fact.superseded_by.map(|id| id.to_string()),
            ],
        )
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(openmemory_core::errors::StorageError::Sqlite { message: format!("no fact {} visible to this tenant", fact.id) }.into());
    }
    Ok(())
}

/// The current active fact (if any) for `(subject, predicate, userId)`,
/// the row `insertFact` reads before deciding create/reinforce/supersede.
pub fn active_fact(conn: &Connection, tenant: &TenantScope, user_id: &str, subject: &str, predicate: &str) -> OpenMemoryResult<Option<TemporalFact>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, subject, predicate, object, confidence, valid_from, valid_to, metadata_json, last_updated, superseded_by
         FROM temporal_facts
         WHERE user_id = ?1 AND subject = ?2 AND predicate = ?3 AND valid_to IS NULL {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let row = if let Some(p) = param {
        stmt.query_row(params![user_id, subject, predicate, p], row_to_fact).optional()
    } else {
        stmt.query_row(params![user_id, subject, predicate], row_to_fact).optional()
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

pub fn fact_by_id(conn: &Connection, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<TemporalFact>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, subject, predicate, object, confidence, valid_from, valid_to, metadata_json, last_updated, superseded_by
         FROM temporal_facts WHERE id = ?1 {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let row = if let Some(p) = param {
        stmt.query_row(params![id.to_string(), p], row_to_fact).optional()
    } else {
        stmt.query_row(params![id.to_string()], row_to_fact).optional()
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

pub fn facts_for_subject(conn: &Connection, tenant: &TenantScope, user_id: &str, subject: &str) -> OpenMemoryResult<Vec<TemporalFact>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, subject, predicate, object, confidence, valid_from, valid_to, metadata_json, last_updated, superseded_by
         FROM temporal_facts WHERE user_id = ?1 AND subject = ?2 {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = if let Some(p) = param {
        stmt.query_map(params![user_id, subject, p], row_to_fact)
    } else {
        stmt.query_map(params![user_id, subject], row_to_fact)
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))?.into_iter().collect()
}

/// All active facts, for the periodic confidence-decay sweep.
pub fn all_active_facts(conn: &Connection, tenant: &TenantScope) -> OpenMemoryResult<Vec<TemporalFact>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, subject, predicate, object, confidence, valid_from, valid_to, metadata_json, last_updated, superseded_by
         FROM temporal_facts WHERE valid_to IS NULL {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = if let Some(p) = param { stmt.query_map(params![p], row_to_fact) } else { stmt.query_map([], row_to_fact) }
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))?.into_iter().collect()
}

fn row_to_fact(row: &rusqlite::Row<'_>) -> rusqlite::Result<OpenMemoryResult<TemporalFact>> {
    Ok(try_row_to_fact(row))
}

fn try_row_to_fact(row: &rusqlite::Row<'_>) -> OpenMemoryResult<TemporalFact> {
    let id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_from: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_to: Option<String> = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let last_updated: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let superseded_by: Option<String> = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(TemporalFact {
        id: Uuid::parse_str(&id).map_err(|e| to_storage_err(e.to_string()))?,
        user_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        subject: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        predicate: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        object: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        confidence: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        valid_from: parse_dt(&valid_from)?,
        valid_to: valid_to.as_deref().map(parse_dt).transpose()?,
        metadata: serde_json::from_str::<HashMap<String, serde_json::Value>>(&metadata_json).map_err(|e| to_storage_err(e.to_string()))?,
        last_updated: parse_dt(&last_updated)?,
        superseded_by: superseded_by.map(|s| Uuid::parse_str(&s)).transpose().map_err(|e| to_storage_err(e.to_string()))?,
    })
}

pub fn insert_edge(conn: &Connection, tenant: &TenantScope, edge: &TemporalEdge) -> OpenMemoryResult<()> {
    conn.execute(
        "INSERT INTO temporal_edges (
            id, tenant_id, user_id, from_entity, relation, to_entity, weight, confidence,
            valid_from, valid_to, last_updated
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            edge.id.to_string(),
            tenant.tenant_id(),
            edge.user_id,
            edge.from_entity,
            edge.relation,
            edge.to_entity,
            edge.weight,
            edge.confidence,
            edge.valid_from.to_rfc3339(),
            edge.valid_to.map(|t| t.to_rfc3339()),
            edge.last_updated.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_edge(conn: &Connection, tenant: &TenantScope, edge: &TemporalEdge) -> OpenMemoryResult<()> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "UPDATE temporal_edges SET weight = ?2, confidence = ?3, valid_to = ?4, last_updated = ?5 WHERE id = ?1 {clause}"
    );
    let rows = if let Some(p) = param {
        conn.execute(
            &sql,
            params![edge.id.to_string(), edge.weight, edge.confidence, edge.valid_to.map(|t| t.to_rfc3339()), edge.last_updated.to_rfc3339(), p],
        )
    } else {
        conn.execute(
            &sql,
            params![edge.id.to_string(), edge.weight, edge.confidence, edge.valid_to.map(|t| t.to_rfc3339()), edge.last_updated.to_rfc3339()],
        )
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(openmemory_core::errors::StorageError::Sqlite { message: format!("no edge {} visible to this tenant", edge.id) }.into());
    }
    Ok(())
}

pub fn active_edge(conn: &Connection, tenant: &TenantScope, user_id: &str, from_entity: &str, relation: &str, to_entity: &str) -> OpenMemoryResult<Option<TemporalEdge>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, from_entity, relation, to_entity, weight, confidence, valid_from, valid_to, last_updated
         FROM temporal_edges
         WHERE user_id = ?1 AND from_entity = ?2 AND relation = ?3 AND to_entity = ?4 AND valid_to IS NULL {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let row = if let Some(p) = param {
        stmt.query_row(params![user_id, from_entity, relation, to_entity, p], row_to_edge).optional()
    } else {
        stmt.query_row(params![user_id, from_entity, relation, to_entity], row_to_edge).optional()
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

pub fn edge_by_id(conn: &Connection, tenant: &TenantScope, id: Uuid) -> OpenMemoryResult<Option<TemporalEdge>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, from_entity, relation, to_entity, weight, confidence, valid_from, valid_to, last_updated
         FROM temporal_edges WHERE id = ?1 {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let row = if let Some(p) = param {
        stmt.query_row(params![id.to_string(), p], row_to_edge).optional()
    } else {
        stmt.query_row(params![id.to_string()], row_to_edge).optional()
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

/// Every edge (active or closed) touching `entity` as either endpoint,
/// for `Ide::getContext`'s graph projection.
pub fn edges_for_entity(conn: &Connection, tenant: &TenantScope, user_id: &str, entity: &str) -> OpenMemoryResult<Vec<TemporalEdge>> {
    let (clause, param) = tenant_clause(tenant);
    let sql = format!(
        "SELECT id, user_id, from_entity, relation, to_entity, weight, confidence, valid_from, valid_to, last_updated
         FROM temporal_edges WHERE user_id = ?1 AND (from_entity = ?2 OR to_entity = ?2) {clause}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = if let Some(p) = param {
        stmt.query_map(params![user_id, entity, p], row_to_edge)
    } else {
        stmt.query_map(params![user_id, entity], row_to_edge)
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))?.into_iter().collect()
}

fn row_to_edge(row: &rusqlite::Row<'_>) -> rusqlite::Result<OpenMemoryResult<TemporalEdge>> {
    Ok(try_row_to_edge(row))
}

fn try_row_to_edge(row: &rusqlite::Row<'_>) -> OpenMemoryResult<TemporalEdge> {
    let id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_from: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_to: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let last_updated: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(TemporalEdge {
        id: Uuid::parse_str(&id).map_err(|e| to_storage_err(e.to_string()))?,
        user_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        from_entity: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        relation: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        to_entity: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        weight: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        confidence: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        valid_from: parse_dt(&valid_from)?,
        valid_to: valid_to.as_deref().map(parse_dt).transpose()?,
        last_updated: parse_dt(&last_updated)?,
    })
}

fn parse_dt(s: &str) -> OpenMemoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use std::collections::HashMap as Map;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn fact(now: DateTime<Utc>) -> TemporalFact {
        TemporalFact {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            subject: "alice".into(),
            predicate: "livesIn".into(),
            object: "boston".into(),
            confidence: 0.8,
            valid_from: now,
            valid_to: None,
            metadata: Map::new(),
            last_updated: now,
            superseded_by: None,
        }
    }

    #[test]
    fn insert_then_active_fact_round_trips() {
        let conn = test_conn();
        let tenant = TenantScope::of("acme");
        let f = fact(Utc::now());
        insert_fact(&conn, &tenant, &f).unwrap();

        let found = active_fact(&conn, &tenant, "u1", "alice", "livesIn").unwrap().unwrap();
        assert_eq!(found.object, "boston");
    }

    #[test]
    fn closing_a_fact_clears_active_lookup() {
        let conn = test_conn();
        let tenant = TenantScope::of("acme");
        let mut f = fact(Utc::now());
        insert_fact(&conn, &tenant, &f).unwrap();
        f.close(Utc::now(), None);
        update_fact(&conn, &tenant, &f).unwrap();

        assert!(active_fact(&conn, &tenant, "u1", "alice", "livesIn").unwrap().is_none());
    }

    #[test]
    fn other_tenant_cannot_see_fact() {
        let conn = test_conn();
        insert_fact(&conn, &TenantScope::of("acme"), &fact(Utc::now())).unwrap();
        assert!(active_fact(&conn, &TenantScope::of("other"), "u1", "alice", "livesIn").unwrap().is_none());
    }
}
