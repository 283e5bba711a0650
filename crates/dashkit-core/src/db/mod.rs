//! SQLite key-value backend.
//!
//! A single `storage` table maps collection keys to their JSON text. Several
//! handles may point at the same file; each one plays the part of a browser
//! tab, so a write from one is visible to the others on their next read.

mod schema;
mod storage;

pub use schema::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

/// How long a handle waits on another handle's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens (or creates) the file at `path` in WAL mode.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        Self::with_schema(conn, Some(path.to_path_buf()))
    }

    /// Private to this handle; nothing is written to disk.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::with_schema(Connection::open_in_memory()?, None)
    }

    fn with_schema(conn: Connection, path: Option<PathBuf>) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// Backing file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Count of stored collections.
    pub fn collection_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM storage", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_starts_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.path().is_none());
        assert_eq!(db.collection_count().unwrap(), 0);
    }

    #[test]
    fn test_storage_table_created() {
        let db = Database::open_in_memory().unwrap();
        let found: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'storage'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(found, 1);
    }

    #[test]
    fn test_handles_share_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashkit.db");

        let first = Database::open(&path).unwrap();
        first.put("clinic-patients", "[]").unwrap();

        let second = Database::open(&path).unwrap();
        assert_eq!(second.path(), Some(path.as_path()));
        assert_eq!(second.fetch("clinic-patients").unwrap(), Some("[]".into()));
        assert_eq!(second.collection_count().unwrap(), 1);
    }
}
