//! Persistence for the waypoint graph (spec.md §4.3 "Coactivation & waypoint
//! reinforcement"). Waypoints are not tenant-scoped directly — they key off
//! memory ids, which are already tenant-isolated one layer up.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use openmemory_core::errors::OpenMemoryResult;
use openmemory_core::memory::Waypoint;

use crate::to_storage_err;

pub fn get(conn: &Connection, from: Uuid, to: Uuid) -> OpenMemoryResult<Option<Waypoint>> {
    conn.query_row(
        "SELECT from_memory_id, to_memory_id, weight, coactivation_count, created_at, last_reinforced_at
         FROM waypoints WHERE from_memory_id = ?1 AND to_memory_id = ?2",
        params![from.to_string(), to.to_string()],
        row_to_waypoint,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

/// Inserts or overwrites the edge at its new weight/count. Reinforcement
/// callers read the current edge with [`get`] first and pass the already
/// reinforced value in.
pub fn upsert(conn: &Connection, waypoint: &Waypoint) -> OpenMemoryResult<()> {
    conn.execute(
        "INSERT INTO waypoints (from_memory_id, to_memory_id, weight, coactivation_count, created_at, last_reinforced_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (from_memory_id, to_memory_id) DO UPDATE SET
            weight = excluded.weight,
            coactivation_count = excluded.coactivation_count,
            last_reinforced_at = excluded.last_reinforced_at",
        params![
            waypoint.from_memory_id.to_string(),
            waypoint.to_memory_id.to_string(),
            waypoint.weight,
            waypoint.coactivation_count as i64,
            waypoint.created_at.to_rfc3339(),
            waypoint.last_reinforced_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete(conn: &Connection, from: Uuid, to: Uuid) -> OpenMemoryResult<()> {
    conn.execute(
        "DELETE FROM waypoints WHERE from_memory_id = ?1 AND to_memory_id = ?2",
        params![from.to_string(), to.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// All edges touching `memory_id` in either direction, for the delete path's
/// orphan-waypoint sweep (spec.md §4.3 "Delete").
pub fn edges_touching(conn: &Connection, memory_id: Uuid) -> OpenMemoryResult<Vec<Waypoint>> {
    let mut stmt = conn
        .prepare(
            "SELECT from_memory_id, to_memory_id, weight, coactivation_count, created_at, last_reinforced_at
             FROM waypoints WHERE from_memory_id = ?1 OR to_memory_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![memory_id.to_string()], row_to_waypoint)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))?.into_iter().collect()
}

pub fn delete_all_touching(conn: &Connection, memory_id: Uuid) -> OpenMemoryResult<()> {
    conn.execute(
        "DELETE FROM waypoints WHERE from_memory_id = ?1 OR to_memory_id = ?1",
        params![memory_id.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Every edge on disk, for a full reinforcement/prune maintenance pass.
pub fn all(conn: &Connection) -> OpenMemoryResult<Vec<Waypoint>> {
    let mut stmt = conn
        .prepare("SELECT from_memory_id, to_memory_id, weight, coactivation_count, created_at, last_reinforced_at FROM waypoints")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt.query_map([], row_to_waypoint).map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))?.into_iter().collect()
}

/// Waypoints pointing at any memory already in the caller's current top-k,
/// for the one-hop `waypointBoost` propagation (spec.md §4.3 step 5).
pub fn edges_into(conn: &Connection, targets: &[Uuid]) -> OpenMemoryResult<Vec<Waypoint>> {
    if targets.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = (0..targets.len()).map(|i| format!("?{}", i + 1)).collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT from_memory_id, to_memory_id, weight, coactivation_count, created_at, last_reinforced_at
         FROM waypoints WHERE to_memory_id IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let ids: Vec<String> = targets.iter().map(|id| id.to_string()).collect();
    let rows = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), row_to_waypoint)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))?.into_iter().collect()
}

fn row_to_waypoint(row: &rusqlite::Row<'_>) -> rusqlite::Result<OpenMemoryResult<Waypoint>> {
    Ok(try_row_to_waypoint(row))
}

fn try_row_to_waypoint(row: &rusqlite::Row<'_>) -> OpenMemoryResult<Waypoint> {
    let from: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let to: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let last_reinforced_at: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> OpenMemoryResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).map_err(|e| to_storage_err(e.to_string()))
    };

    Ok(Waypoint {
        from_memory_id: Uuid::parse_str(&from).map_err(|e| to_storage_err(e.to_string()))?,
        to_memory_id: Uuid::parse_str(&to).map_err(|e| to_storage_err(e.to_string()))?,
        weight: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        coactivation_count: row.get::<_, i64>(3).map_err(|e| to_storage_err(e.to_string()))? as u64,
        created_at: parse_dt(&created_at)?,
        last_reinforced_at: parse_dt(&last_reinforced_at)?,
    })
}

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
    fn upsert_then_get_round_trips() {
        let conn = test_conn();
        let wp = Waypoint::new(Uuid::new_v4(), Uuid::new_v4(), 0.3);
        upsert(&conn, &wp).unwrap();
        let fetched = get(&conn, wp.from_memory_id, wp.to_memory_id).unwrap().unwrap();
        assert_eq!(fetched.weight, 0.3);
    }

    #[test]
    fn upsert_overwrites_existing_edge() {
        let conn = test_conn();
        let mut wp = Waypoint::new(Uuid::new_v4(), Uuid::new_v4(), 0.3);
        upsert(&conn, &wp).unwrap();
        wp.reinforce(0.2);
        upsert(&conn, &wp).unwrap();
        let fetched = get(&conn, wp.from_memory_id, wp.to_memory_id).unwrap().unwrap();
        assert_eq!(fetched.coactivation_count, 2);
    }

    #[test]
    fn delete_all_touching_removes_both_directions() {
        let conn = test_conn();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        upsert(&conn, &Waypoint::new(a, b, 0.2)).unwrap();
        upsert(&conn, &Waypoint::new(c, a, 0.4)).unwrap();
        delete_all_touching(&conn, a).unwrap();
        assert!(all(&conn).unwrap().is_empty());
    }
}
