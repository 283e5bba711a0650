//! Storage table DDL, applied on every open.

pub const SCHEMA: &str = r#"
-- key: collection name such as 'clinic-patients'; value: JSON array text
CREATE TABLE IF NOT EXISTS storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Recently written collections
CREATE INDEX IF NOT EXISTS idx_storage_updated ON storage(updated_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_reapplying_schema_is_harmless() {
        let conn = setup_conn();
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_updated_at_defaults() {
        let conn = setup_conn();
        conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)",
            ["physio-sessions", "[]"],
        )
        .unwrap();

        let stamp: String = conn
            .query_row(
                "SELECT updated_at FROM storage WHERE key = 'physio-sessions'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!stamp.is_empty());
    }

    #[test]
    fn test_one_row_per_key() {
        let conn = setup_conn();
        let insert = "INSERT INTO storage (key, value) VALUES (?1, ?2)";
        conn.execute(insert, ["clinic-patients", "[]"]).unwrap();
        assert!(conn.execute(insert, ["clinic-patients", "[1]"]).is_err());
    }
}
