//! Canonical in-memory collection for one entity type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Fingerprint, KeyValueStore, StoreContext, StoreResult};
use crate::view::text_matches;

/// An entity held in a [`RecordStore`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Text fields searched by [`RecordStore::search`].
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, query: &str) -> bool {
        text_matches(&self.search_fields(), query)
    }
}

/// Ordered collection of one entity type, persisted under a single key.
///
/// Mutations are applied to a copy, written through the [`StoreContext`], and
/// only then become visible, so memory never runs ahead of storage.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    key: String,
    items: Vec<T>,
    fingerprint: Option<Fingerprint>,
}

impl<T: Record> RecordStore<T> {
    /// Empty, not yet initialized store for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            items: Vec::new(),
            fingerprint: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load from storage, or install and persist `seed` when the key is absent.
    pub fn initialize<S, F>(&mut self, ctx: &StoreContext<S>, seed: F) -> StoreResult<()>
    where
        S: KeyValueStore,
        F: FnOnce() -> Vec<T>,
    {
        match ctx.load::<T>(&self.key)? {
            Some(loaded) => {
                self.items = loaded.items;
                self.fingerprint = Some(loaded.fingerprint);
            }
            None => {
                let items = seed();
                let fingerprint = ctx.save(&self.key, &items, None)?;
                tracing::info!(key = %self.key, count = items.len(), "Installed seed collection");
                self.items = items;
                self.fingerprint = Some(fingerprint);
            }
        }
        Ok(())
    }

    /// Re-read storage, picking up writes made elsewhere. An absent key
    /// empties the store.
    pub fn reload<S: KeyValueStore>(&mut self, ctx: &StoreContext<S>) -> StoreResult<()> {
        match ctx.load::<T>(&self.key)? {
            Some(loaded) => {
                self.items = loaded.items;
                self.fingerprint = Some(loaded.fingerprint);
            }
            None => {
                self.items.clear();
                self.fingerprint = None;
            }
        }
        Ok(())
    }

    /// Assign a fresh id, append, persist. Returns the stored entity.
    pub fn create<S: KeyValueStore>(&mut self, ctx: &StoreContext<S>, mut entity: T) -> StoreResult<T> {
        entity.set_id(ctx.next_id());
        let mut next = self.items.clone();
        next.push(entity.clone());
        self.commit(ctx, next)?;
        Ok(entity)
    }

    /// Replace the entity with `id` by `replacement` (which keeps `id`).
    /// Returns `false` and leaves everything untouched when `id` is unknown.
    pub fn update<S: KeyValueStore>(
        &mut self,
        ctx: &StoreContext<S>,
        id: &str,
        mut replacement: T,
    ) -> StoreResult<bool> {
        let Some(pos) = self.position(id) else {
            tracing::debug!(key = %self.key, id, "Update of unknown record ignored");
            return Ok(false);
        };
        replacement.set_id(id.to_string());
        let mut next = self.items.clone();
        next[pos] = replacement;
        self.commit(ctx, next)?;
        Ok(true)
    }

    /// Edit the entity with `id` in place. `false` when unknown.
    pub fn modify<S, F>(&mut self, ctx: &StoreContext<S>, id: &str, f: F) -> StoreResult<bool>
    where
        S: KeyValueStore,
        F: FnOnce(&mut T),
    {
        let Some(pos) = self.position(id) else {
            tracing::debug!(key = %self.key, id, "Modify of unknown record ignored");
            return Ok(false);
        };
        let mut next = self.items.clone();
        f(&mut next[pos]);
        self.commit(ctx, next)?;
        Ok(true)
    }

    /// Edit every entity matching `predicate`. Persists only when something
    /// matched; returns the number of entities touched.
    pub fn modify_where<S, P, F>(
        &mut self,
        ctx: &StoreContext<S>,
        predicate: P,
        mut f: F,
    ) -> StoreResult<usize>
    where
        S: KeyValueStore,
        P: Fn(&T) -> bool,
        F: FnMut(&mut T),
    {
        let mut next = self.items.clone();
        let mut touched = 0;
        for item in next.iter_mut() {
            if predicate(&*item) {
                f(item);
                touched += 1;
            }
        }
        if touched > 0 {
            self.commit(ctx, next)?;
        }
        Ok(touched)
    }

    /// Remove the entity with `id`, returning it. `None` when unknown.
    pub fn delete<S: KeyValueStore>(&mut self, ctx: &StoreContext<S>, id: &str) -> StoreResult<Option<T>> {
        let Some(pos) = self.position(id) else {
            tracing::debug!(key = %self.key, id, "Delete of unknown record ignored");
            return Ok(None);
        };
        let mut next = self.items.clone();
        let removed = next.remove(pos);
        self.commit(ctx, next)?;
        Ok(Some(removed))
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Entities whose search fields contain `query`, case-insensitively, in
    /// collection order. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&T> {
        self.items.iter().filter(|item| item.matches(query)).collect()
    }

    pub fn filter<P: Fn(&T) -> bool>(&self, predicate: P) -> Vec<&T> {
        self.items.iter().filter(|item| predicate(*item)).collect()
    }

    pub fn count<P: Fn(&T) -> bool>(&self, predicate: P) -> usize {
        self.items.iter().filter(|item| predicate(*item)).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn commit<S: KeyValueStore>(&mut self, ctx: &StoreContext<S>, next: Vec<T>) -> StoreResult<()> {
        let fingerprint = ctx.save(&self.key, &next, self.fingerprint.as_ref())?;
        self.items = next;
        self.fingerprint = Some(fingerprint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IdGenerator, MemoryStore, StoreError, WritePolicy};
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        title: String,
        body: String,
    }

    impl Record for Note {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.title.as_str(), self.body.as_str()]
        }
    }

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.into(),
            title: title.into(),
            body: String::new(),
        }
    }

    fn seed() -> Vec<Note> {
        vec![note("1", "Alpha"), note("2", "Beta")]
    }

    fn setup() -> (StoreContext<MemoryStore>, RecordStore<Note>) {
        let ctx = StoreContext::with_defaults(MemoryStore::new());
        let mut store = RecordStore::new("test-notes");
        store.initialize(&ctx, seed).unwrap();
        (ctx, store)
    }

    #[test]
    fn test_initialize_installs_and_persists_seed() {
        let (ctx, store) = setup();
        assert_eq!(store.len(), 2);
        assert!(ctx.backend().get_item("test-notes").unwrap().is_some());
    }

    #[test]
    fn test_initialize_twice_does_not_duplicate() {
        let (ctx, mut store) = setup();
        let ids: Vec<String> = store.list().iter().map(|n| n.id.clone()).collect();

        store.initialize(&ctx, seed).unwrap();
        let mut remounted = RecordStore::<Note>::new("test-notes");
        remounted.initialize(&ctx, seed).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(remounted.list(), store.list());
        let after: Vec<String> = remounted.list().iter().map(|n| n.id.clone()).collect();
        assert_eq!(after, ids);
    }

    #[test]
    fn test_create_assigns_id_and_persists() {
        let (ctx, mut store) = setup();

        let created = store.create(&ctx, note("", "Gamma")).unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(store.len(), 3);

        let mut reopened = RecordStore::<Note>::new("test-notes");
        reopened.initialize(&ctx, Vec::new).unwrap();
        assert_eq!(reopened.get(&created.id), Some(&created));
    }

    #[test]
    fn test_same_tick_creates_get_distinct_ids() {
        let (ctx, mut store) = setup();
        let a = store.create(&ctx, note("", "A")).unwrap();
        let b = store.create(&ctx, note("", "B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_update_replaces_whole_entity() {
        let (ctx, mut store) = setup();

        let replacement = Note {
            id: "ignored".into(),
            title: "Alpha 2".into(),
            body: "new body".into(),
        };
        assert!(store.update(&ctx, "1", replacement).unwrap());

        let updated = store.get("1").unwrap();
        assert_eq!(updated.title, "Alpha 2");
        assert_eq!(updated.body, "new body");
        assert_eq!(store.list()[0].id, "1");
    }

    #[test]
    fn test_update_missing_is_noop() {
        let (ctx, mut store) = setup();
        let before = store.list().to_vec();
        let raw_before = ctx.backend().get_item("test-notes").unwrap();

        assert!(!store.update(&ctx, "404", note("", "X")).unwrap());
        assert_eq!(store.list(), before.as_slice());
        assert_eq!(ctx.backend().get_item("test-notes").unwrap(), raw_before);
    }

    #[test]
    fn test_delete() {
        let (ctx, mut store) = setup();

        let removed = store.delete(&ctx, "1").unwrap();
        assert_eq!(removed.map(|n| n.title), Some("Alpha".into()));
        assert!(store.delete(&ctx, "1").unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_everything_keeps_store_empty_after_reopen() {
        let (ctx, mut store) = setup();
        store.delete(&ctx, "1").unwrap();
        store.delete(&ctx, "2").unwrap();

        let mut reopened = RecordStore::<Note>::new("test-notes");
        reopened.initialize(&ctx, seed).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_modify_where_counts_and_skips_write_when_nothing_matches() {
        let (ctx, mut store) = setup();

        let touched = store
            .modify_where(&ctx, |n| n.title.starts_with('A'), |n| n.body = "seen".into())
            .unwrap();
        assert_eq!(touched, 1);
        assert_eq!(store.get("1").unwrap().body, "seen");

        let none = store.modify_where(&ctx, |_| false, |_| {}).unwrap();
        assert_eq!(none, 0);
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let (ctx, mut store) = setup();
        store.create(&ctx, note("", "alphabet")).unwrap();

        let titles: Vec<&str> = store.search("ALPHA").iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "alphabet"]);
        assert_eq!(store.search("").len(), 3);
    }

    #[test]
    fn test_two_tabs_last_write_wins() {
        let backend = Arc::new(MemoryStore::new());
        let tab_a = StoreContext::with_defaults(Arc::clone(&backend));
        let tab_b = StoreContext::with_defaults(Arc::clone(&backend));

        let mut store_a = RecordStore::<Note>::new("test-notes");
        store_a.initialize(&tab_a, seed).unwrap();
        let mut store_b = RecordStore::<Note>::new("test-notes");
        store_b.initialize(&tab_b, seed).unwrap();

        store_a.create(&tab_a, note("", "From A")).unwrap();
        store_b.create(&tab_b, note("", "From B")).unwrap();

        let mut fresh = RecordStore::<Note>::new("test-notes");
        fresh.reload(&tab_a).unwrap();
        let titles: Vec<&str> = fresh.list().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "From B"]);
    }

    #[test]
    fn test_two_tabs_reject_stale() {
        let backend = Arc::new(MemoryStore::new());
        let tab_a = StoreContext::new(
            Arc::clone(&backend),
            IdGenerator::default(),
            WritePolicy::RejectStale,
        );
        let tab_b = StoreContext::new(
            Arc::clone(&backend),
            IdGenerator::default(),
            WritePolicy::RejectStale,
        );

        let mut store_a = RecordStore::<Note>::new("test-notes");
        store_a.initialize(&tab_a, seed).unwrap();
        let mut store_b = RecordStore::<Note>::new("test-notes");
        store_b.initialize(&tab_b, seed).unwrap();

        store_a.create(&tab_a, note("", "From A")).unwrap();

        let err = store_b.create(&tab_b, note("", "From B")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(store_b.len(), 2);

        store_b.reload(&tab_b).unwrap();
        store_b.create(&tab_b, note("", "From B")).unwrap();
        assert_eq!(store_b.len(), 4);
    }
}
