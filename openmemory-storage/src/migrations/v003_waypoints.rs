use rusqlite::Connection;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE waypoints (
            from_memory_id TEXT NOT NULL,
            to_memory_id TEXT NOT NULL,
            weight REAL NOT NULL,
            coactivation_count INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            last_reinforced_at TEXT NOT NULL,
            PRIMARY KEY (from_memory_id, to_memory_id)
        );

        CREATE INDEX idx_waypoints_from ON waypoints (from_memory_id);
        CREATE INDEX idx_waypoints_to ON waypoints (to_memory_id);
        ",
    )
}
