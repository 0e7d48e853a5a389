use rusqlite::Connection;

/// FTS5 index over `search_text`, the plaintext tokens extracted before the
/// content column is encrypted. Kept in sync via triggers so callers never
/// have to remember to update it by hand.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE VIRTUAL TABLE memories_fts USING fts5(
            id UNINDEXED,
            search_text,
            content='memories',
            content_rowid='rowid'
        );

        CREATE TRIGGER memories_fts_insert AFTER INSERT ON memories BEGIN
            INSERT INTO memories_fts(rowid, id, search_text) VALUES (new.rowid, new.id, new.search_text);
        END;

        CREATE TRIGGER memories_fts_delete AFTER DELETE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, id, search_text) VALUES ('delete', old.rowid, old.id, old.search_text);
        END;

        CREATE TRIGGER memories_fts_update AFTER UPDATE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, id, search_text) VALUES ('delete', old.rowid, old.id, old.search_text);
            INSERT INTO memories_fts(rowid, id, search_text) VALUES (new.rowid, new.id, new.search_text);
        END;
        ",
    )
}
