//! Identity-scoped preference storage.
//!
//! `ScopedStore` is the only writer of per-user records. It never propagates
//! storage failures: an unreadable or unavailable record reads as an empty
//! collection and a failed write is logged and dropped.

use std::collections::HashMap;
use std::sync::Arc;

use marquee_core::catalog::{Item, ItemId};
use marquee_core::preferences::{
    Favorites, LogicalName, Record, RecentSearches, SESSION_KEY, SessionRecord, scoped_key,
};
use marquee_core::session::Identity;
use marquee_core::store::KeyValueStore;
use tokio::sync::Mutex;

/// Favorites and recent searches keyed by identity, plus the session record.
pub struct ScopedStore {
    store: Arc<dyn KeyValueStore>,
    /// One lock per storage key, held across each read-modify-write. Idle
    /// entries are swept whenever a lock is handed out.
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ScopedStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    // ============================================================================
    // Favorites
    // ============================================================================

    pub async fn favorites(&self, identity: &Identity) -> Favorites {
        let key = scoped_key(identity.as_str(), LogicalName::Favorites);
        self.read(&key).await.unwrap_or_default()
    }

    /// Replaces the whole favorites set. Duplicate identifiers are dropped.
    pub async fn replace_favorites(&self, identity: &Identity, items: Vec<Item>) {
        let key = scoped_key(identity.as_str(), LogicalName::Favorites);
        let lock = self.key_lock(&key).await;
        let _guard = lock.lock().await;
        self.write(&key, &Favorites::from_items(items)).await;
    }

    /// Adds `item` unless its identifier is already a favorite.
    ///
    /// Returns `true` if the stored set changed.
    pub async fn add_favorite(&self, identity: &Identity, item: Item) -> bool {
        let key = scoped_key(identity.as_str(), LogicalName::Favorites);
        self.modify(&key, |favorites: &mut Favorites| favorites.add(item))
            .await
    }

    /// Removes the favorite with identifier `id`. Returns `true` if it was present.
    pub async fn remove_favorite(&self, identity: &Identity, id: ItemId) -> bool {
        let key = scoped_key(identity.as_str(), LogicalName::Favorites);
        self.modify(&key, |favorites: &mut Favorites| favorites.remove(id))
            .await
    }

    /// Adds `item` if absent, removes it otherwise, in one locked step.
    ///
    /// Returns whether the item is a favorite afterwards.
    pub async fn toggle_favorite(&self, identity: &Identity, item: Item) -> bool {
        let key = scoped_key(identity.as_str(), LogicalName::Favorites);
        let mut now_favorite = false;
        self.modify(&key, |favorites: &mut Favorites| {
            now_favorite = favorites.toggle(item);
            true
        })
        .await;
        now_favorite
    }

    pub async fn is_favorite(&self, identity: &Identity, id: ItemId) -> bool {
        self.favorites(identity).await.contains(id)
    }

    // ============================================================================
    // Recent searches
    // ============================================================================

    pub async fn recent_searches(&self, identity: &Identity) -> RecentSearches {
        let key = scoped_key(identity.as_str(), LogicalName::RecentSearches);
        self.read(&key).await.unwrap_or_default()
    }

    /// Records `query` as the most recent search. Blank queries are ignored.
    pub async fn add_recent_search(&self, identity: &Identity, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }
        let key = scoped_key(identity.as_str(), LogicalName::RecentSearches);
        self.modify(&key, |recent: &mut RecentSearches| recent.record(query))
            .await
    }

    // ============================================================================
    // Session record
    // ============================================================================

    pub async fn session_record(&self) -> Option<SessionRecord> {
        self.read(SESSION_KEY).await
    }

    pub async fn save_session_record(&self, record: &SessionRecord) {
        let lock = self.key_lock(SESSION_KEY).await;
        let _guard = lock.lock().await;
        self.write(SESSION_KEY, record).await;
    }

    pub async fn clear_session_record(&self) {
        let lock = self.key_lock(SESSION_KEY).await;
        let _guard = lock.lock().await;
        if let Err(e) = self.store.remove(SESSION_KEY).await {
            tracing::warn!("Failed to clear session record: {}", e);
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        // Only the map holds an idle lock; anyone mid-operation holds a clone.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Reads and decodes `key`. Absent, unreadable and corrupt all yield `None`.
    async fn read<R: Record>(&self, key: &str) -> Option<R> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Storage unavailable reading '{}': {}", key, e);
                return None;
            }
        };
        match R::decode(key, &raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring unreadable record: {}", e);
                None
            }
        }
    }

    async fn write<R: Record>(&self, key: &str, record: &R) {
        let encoded = match record.encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("Failed to encode '{}': {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, encoded).await {
            tracing::warn!("Failed to write '{}': {}", key, e);
        }
    }

    /// Locked read-modify-write. Writes only when `f` reports a change.
    async fn modify<R, F>(&self, key: &str, f: F) -> bool
    where
        R: Record + Default,
        F: FnOnce(&mut R) -> bool,
    {
        let lock = self.key_lock(key).await;
        let _guard = lock.lock().await;

        let mut record: R = self.read(key).await.unwrap_or_default();
        let changed = f(&mut record);
        if changed {
            self.write(key, &record).await;
        }
        changed
    }
}
