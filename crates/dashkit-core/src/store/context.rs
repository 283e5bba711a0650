//! Persistence adapter: JSON collections under string keys.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{IdGenerator, IdStrategy, KeyValueStore, StoreError, StoreResult};
use crate::config::RecordsConfig;

/// What to do when storage changed underneath a store (another tab wrote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Overwrite unconditionally
    #[default]
    LastWriteWins,
    /// Fail with [`StoreError::Conflict`] if the stored value is not the one
    /// this store last read or wrote
    RejectStale,
}

/// SHA-256 of a raw stored value, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(raw: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A decoded collection plus the fingerprint of the value it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub fingerprint: Fingerprint,
}

/// Per-dashboard context: backend, id source and write policy.
pub struct StoreContext<S> {
    backend: S,
    ids: IdGenerator,
    policy: WritePolicy,
}

impl<S: KeyValueStore> StoreContext<S> {
    pub fn new(backend: S, ids: IdGenerator, policy: WritePolicy) -> Self {
        Self {
            backend,
            ids,
            policy,
        }
    }

    /// Context with the default timestamp ids and last-write-wins saves.
    pub fn with_defaults(backend: S) -> Self {
        Self::new(
            backend,
            IdGenerator::new(IdStrategy::Timestamp),
            WritePolicy::LastWriteWins,
        )
    }

    pub fn from_config(backend: S, config: &RecordsConfig) -> Self {
        Self::new(
            backend,
            IdGenerator::new(config.id_strategy),
            config.write_policy,
        )
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// Fresh record identifier.
    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    /// Read and decode the collection under `key`. `None` when the key is absent.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<Loaded<T>>> {
        let Some(raw) = self.backend.get_item(key)? else {
            tracing::debug!(key, "No stored collection");
            return Ok(None);
        };

        let items: Vec<T> = serde_json::from_str(&raw).map_err(|source| {
            tracing::error!(key, error = %source, "Stored collection is corrupt");
            StoreError::Corrupt {
                key: key.to_string(),
                source,
            }
        })?;

        tracing::debug!(key, count = items.len(), "Loaded collection");
        Ok(Some(Loaded {
            items,
            fingerprint: Fingerprint::of(&raw),
        }))
    }

    /// Serialize and write `items` under `key`.
    ///
    /// `last_seen` is the fingerprint of the value the caller last read or
    /// wrote (`None` if the key was absent); it only matters under
    /// [`WritePolicy::RejectStale`].
    pub fn save<T: Serialize>(
        &self,
        key: &str,
        items: &[T],
        last_seen: Option<&Fingerprint>,
    ) -> StoreResult<Fingerprint> {
        if self.policy == WritePolicy::RejectStale {
            let current = self.backend.get_item(key)?.map(|raw| Fingerprint::of(&raw));
            if current.as_ref() != last_seen {
                tracing::warn!(key, "Rejected stale write");
                return Err(StoreError::Conflict {
                    key: key.to_string(),
                });
            }
        }

        let raw = serde_json::to_string(items)?;
        self.backend.set_item(key, &raw)?;
        tracing::debug!(key, count = items.len(), "Persisted collection");
        Ok(Fingerprint::of(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        #[serde(with = "crate::store::date")]
        at: chrono::DateTime<chrono::Utc>,
    }

    #[test]
    fn test_load_absent() {
        let ctx = StoreContext::with_defaults(MemoryStore::new());
        let loaded: Option<Loaded<Row>> = ctx.load("missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_rehydrates_dates() {
        let ctx = StoreContext::with_defaults(MemoryStore::new());
        let rows = vec![Row {
            id: "1".into(),
            at: chrono::Utc::now(),
        }];

        let written = ctx.save("rows", &rows, None).unwrap();
        let loaded = ctx.load::<Row>("rows").unwrap().unwrap();

        assert_eq!(loaded.items, rows);
        assert_eq!(loaded.fingerprint, written);
    }

    #[test]
    fn test_load_browser_written_value() {
        let store = MemoryStore::with_items([(
            "rows",
            r#"[{"id":"1","at":"2024-01-15T00:00:00.000Z"}]"#,
        )]);
        let ctx = StoreContext::with_defaults(store);

        let loaded = ctx.load::<Row>("rows").unwrap().unwrap();
        assert_eq!(loaded.items[0].at, crate::store::ymd(2024, 1, 15));
    }

    #[test]
    fn test_corrupt_value() {
        let store = MemoryStore::with_items([("rows", "{not json")]);
        let ctx = StoreContext::with_defaults(store);

        let err = ctx.load::<Row>("rows").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "rows"));
    }

    #[test]
    fn test_last_write_wins_ignores_fingerprint() {
        let ctx = StoreContext::with_defaults(MemoryStore::with_items([("rows", "[]")]));
        let stale = Fingerprint::of("something else");
        ctx.save::<Row>("rows", &[], Some(&stale)).unwrap();
    }

    #[test]
    fn test_reject_stale_write() {
        let ctx = StoreContext::new(
            MemoryStore::with_items([("rows", "[]")]),
            IdGenerator::default(),
            WritePolicy::RejectStale,
        );

        let seen = Fingerprint::of("[]");
        let next = ctx.save::<Row>("rows", &[], Some(&seen)).unwrap();
        assert_eq!(next, seen);

        ctx.backend().set_item("rows", "[ ]").unwrap();
        let err = ctx.save::<Row>("rows", &[], Some(&next)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn test_reject_stale_absent_key() {
        let ctx = StoreContext::new(
            MemoryStore::new(),
            IdGenerator::default(),
            WritePolicy::RejectStale,
        );
        ctx.save::<Row>("rows", &[], None).unwrap();
        assert!(ctx.save::<Row>("other", &[], Some(&Fingerprint::of("[]"))).is_err());
    }
}
