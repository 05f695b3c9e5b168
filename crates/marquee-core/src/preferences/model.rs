//! Per-user preference collections.

use serde::{Deserialize, Serialize};

use crate::catalog::{Item, ItemId};

/// Maximum number of remembered search queries.
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// A user's favorite items, unique by identifier, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    items: Vec<Item>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from an arbitrary list, keeping the first occurrence of
    /// each identifier.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut favorites = Self::new();
        for item in items {
            favorites.add(item);
        }
        favorites
    }

    /// Adds `item` unless an item with the same identifier is present.
    ///
    /// Returns `true` if the set changed.
    pub fn add(&mut self, item: Item) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes the item with identifier `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Removes `item` if present, adds it otherwise.
    ///
    /// Returns whether the item is a favorite afterwards.
    pub fn toggle(&mut self, item: Item) -> bool {
        if self.remove(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Recently issued search queries, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches {
    queries: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `query` as the most recent search.
    ///
    /// The query is trimmed; blank queries are ignored. A query already in the
    /// list moves to the front instead of being duplicated, and the list never
    /// grows beyond [`RECENT_SEARCH_LIMIT`]. Returns `true` if the list changed.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        if self.queries.first().map(String::as_str) == Some(query) {
            return false;
        }
        self.queries.retain(|existing| existing != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(RECENT_SEARCH_LIMIT);
        true
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn into_queries(self) -> Vec<String> {
        self.queries
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
