//! Tab selection and search state for a dashboard.

use crate::store::{Record, RecordStore};

/// A dashboard tab.
pub trait Tab: Copy + Eq + Default + std::fmt::Debug + 'static {
    /// Tabs in display order.
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;
}

/// Which tab is visible and what the search box holds. Everything shown is
/// derived from this plus the record stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState<T: Tab> {
    active: T,
    query: String,
}

impl<T: Tab> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> T {
        self.active
    }

    pub fn is_active(&self, tab: T) -> bool {
        self.active == tab
    }

    /// Switch tabs. The search query is cleared, as each tab has its own list.
    pub fn select(&mut self, tab: T) {
        if self.active != tab {
            self.active = tab;
            self.query.clear();
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Records of `store` matching the current query.
    pub fn visible<'a, R: Record>(&self, store: &'a RecordStore<R>) -> Vec<&'a R> {
        store.search(&self.query)
    }
}

/// Case-insensitive substring match over `fields`. Empty query matches.
pub fn text_matches(fields: &[&str], query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
