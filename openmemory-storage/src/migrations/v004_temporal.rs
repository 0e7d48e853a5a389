use rusqlite::Connection;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE temporal_facts (
            id TEXT PRIMARY KEY,
            tenant_id TEXT,
            user_id TEXT NOT NULL,
            subject TEXT NOT NULL,
            predicate TEXT NOT NULL,
            object TEXT NOT NULL,
            confidence REAL NOT NULL,
            valid_from TEXT NOT NULL,
            valid_to TEXT,
            metadata_json TEXT NOT NULL DEFAULT '{}',
            last_updated TEXT NOT NULL,
            superseded_by TEXT
        );

        CREATE INDEX idx_facts_subject_predicate ON temporal_facts (tenant_id, subject, predicate);
        CREATE INDEX idx_facts_active ON temporal_facts (tenant_id, valid_to);

        CREATE TABLE temporal_edges (
            id TEXT PRIMARY KEY,
            tenant_id TEXT,
            user_id TEXT NOT NULL,
            from_entity TEXT NOT NULL,
            relation TEXT NOT NULL,
            to_entity TEXT NOT NULL,
            weight REAL NOT NULL DEFAULT 1.0,
            confidence REAL NOT NULL,
            valid_from TEXT NOT NULL,
            valid_to TEXT,
            last_updated TEXT NOT NULL
        );

        CREATE INDEX idx_edges_from ON temporal_edges (tenant_id, from_entity);
        CREATE INDEX idx_edges_active ON temporal_edges (tenant_id, valid_to);
        ",
    )
}
