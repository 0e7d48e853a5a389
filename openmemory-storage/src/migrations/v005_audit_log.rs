use rusqlite::Connection;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE memory_audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            memory_id TEXT NOT NULL,
            tenant_id TEXT,
            operation TEXT NOT NULL,
            actor TEXT NOT NULL,
            detail_json TEXT NOT NULL DEFAULT '{}',
            timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX idx_audit_memory ON memory_audit_log (memory_id);
        CREATE INDEX idx_audit_timestamp ON memory_audit_log (timestamp);
        ",
    )
}
