//! Key-value storage operations.

use rusqlite::OptionalExtension;

use super::{Database, DbResult};
use crate::store::{KeyValueStore, StoreResult};

impl Database {
    /// Get the raw value stored under a key.
    pub fn fetch(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM storage WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    /// Insert or overwrite the value for a key.
    pub fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO storage (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            [key, value],
        )?;
        Ok(())
    }

    /// Delete a key.
    pub fn delete_key(&self, key: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM storage WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }

    /// List stored keys starting with a prefix (e.g. a dashboard namespace).
    pub fn keys_with_prefix(&self, prefix: &str) -> DbResult<Vec<String>> {
        let pattern = format!("{}%", prefix);
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM storage WHERE key LIKE ? ORDER BY key")?;
        let rows = stmt.query_map([pattern], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl KeyValueStore for Database {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.fetch(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        Ok(self.put(key, value)?)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.delete_key(key)?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.keys_with_prefix("")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_put_and_fetch() {
        let db = setup_db();

        db.put("clinic-patients", r#"[{"id":"1"}]"#).unwrap();

        let value = db.fetch("clinic-patients").unwrap();
        assert_eq!(value, Some(r#"[{"id":"1"}]"#.into()));
        assert_eq!(db.fetch("clinic-records").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let db = setup_db();

        db.put("toys-sales", "[]").unwrap();
        db.put("toys-sales", r#"[{"id":"9"}]"#).unwrap();

        assert_eq!(db.fetch("toys-sales").unwrap(), Some(r#"[{"id":"9"}]"#.into()));
        assert_eq!(db.keys_with_prefix("").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_key() {
        let db = setup_db();

        db.put("social-posts", "[]").unwrap();
        assert!(db.delete_key("social-posts").unwrap());
        assert!(!db.delete_key("social-posts").unwrap());
        assert_eq!(db.fetch("social-posts").unwrap(), None);
    }

    #[test]
    fn test_keys_with_prefix() {
        let db = setup_db();

        db.put("clinic-patients", "[]").unwrap();
        db.put("clinic-records", "[]").unwrap();
        db.put("factory-machines", "[]").unwrap();

        let clinic = db.keys_with_prefix("clinic-").unwrap();
        assert_eq!(clinic, vec!["clinic-patients", "clinic-records"]);
    }
}
