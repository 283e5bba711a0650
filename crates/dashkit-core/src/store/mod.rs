//! Record stores over a string-keyed key-value backend.
//!
//! ```text
//!   KeyValueStore (MemoryStore | Database)
//!          │  get_item / set_item
//!          ▼
//!   StoreContext ── load(key) / save(key, items) ── fingerprint + WritePolicy
//!          │
//!          ▼
//!   RecordStore<T> ── initialize / create / update / delete / search
//! ```
//!
//! Every mutation re-serializes the whole collection and overwrites the key.

mod context;
mod dates;
mod ids;
mod memory;
mod record;

pub use context::*;
pub use dates::*;
pub use ids::*;
pub use memory::*;
pub use record::*;

use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::db::DbError;

/// Storage and persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Corrupt value under key {key}: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Stale write rejected for key {key}: stored value changed since last read")]
    Conflict { key: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A string-keyed, string-valued external store (the browser's local storage
/// in the original pages).
pub trait KeyValueStore {
    /// Read the raw value for `key`, `None` when absent.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the value for `key`.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key` if present.
    fn remove_item(&self, key: &str) -> StoreResult<()>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}

impl<S: KeyValueStore> KeyValueStore for Mutex<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.lock().map_err(poisoned)?.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock().map_err(poisoned)?.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.lock().map_err(poisoned)?.remove_item(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.lock().map_err(poisoned)?.keys()
    }
}

pub(crate) fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend(format!("Lock poisoned: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn roundtrip(store: &dyn KeyValueStore) {
        assert_eq!(store.get_item("a").unwrap(), None);

        store.set_item("a", "[1]").unwrap();
        store.set_item("b", "[]").unwrap();
        assert_eq!(store.get_item("a").unwrap(), Some("[1]".into()));

        store.set_item("a", "[2]").unwrap();
        assert_eq!(store.get_item("a").unwrap(), Some("[2]".into()));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
        store.remove_item("missing").unwrap();
    }

    #[test]
    fn test_memory_backend() {
        roundtrip(&MemoryStore::new());
    }

    #[test]
    fn test_sqlite_backend() {
        roundtrip(&Database::open_in_memory().unwrap());
    }

    #[test]
    fn test_shared_backend() {
        let shared = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let tab_a = Arc::clone(&shared);
        let tab_b = Arc::clone(&shared);

        tab_a.set_item("k", "from-a").unwrap();
        assert_eq!(tab_b.get_item("k").unwrap(), Some("from-a".into()));
    }
}
