use rusqlite::Connection;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE memories (
            id TEXT PRIMARY KEY,
            tenant_id TEXT,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            search_text TEXT NOT NULL DEFAULT '',
            primary_sector TEXT NOT NULL,
            sectors_json TEXT NOT NULL,
            tags_json TEXT NOT NULL DEFAULT '[]',
            metadata_json TEXT NOT NULL DEFAULT '{}',
            salience REAL NOT NULL DEFAULT 0.5,
            simhash INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            last_seen_at TEXT NOT NULL,
            access_count INTEGER NOT NULL DEFAULT 0,
            mean_vec BLOB,
            compressed_vec BLOB
        );

        CREATE INDEX idx_memories_tenant ON memories (tenant_id);
        CREATE INDEX idx_memories_sector ON memories (tenant_id, primary_sector);
        CREATE INDEX idx_memories_salience ON memories (tenant_id, salience);
        CREATE INDEX idx_memories_simhash ON memories (tenant_id, simhash);
        ",
    )
}
