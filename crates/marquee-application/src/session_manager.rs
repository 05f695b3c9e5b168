//! Current-user session and identity-gated preference access.

use std::sync::Arc;

use marquee_core::catalog::{Item, ItemId};
use marquee_core::error::Result;
use marquee_core::preferences::{Favorites, RecentSearches, SessionRecord};
use marquee_core::session::{CredentialSource, Identity, SessionState};
use tokio::sync::{Mutex, RwLock};

use crate::scoped_store::ScopedStore;

/// Holds who is logged in and routes preference intents to their records.
///
/// While anonymous, reads return empty collections and writes do nothing.
/// The decoded favorites of the current identity are cached; the durable
/// record stays authoritative and the cache is dropped on every write and
/// identity change.
pub struct SessionManager {
    store: Arc<ScopedStore>,
    credentials: Arc<dyn CredentialSource>,
    state: RwLock<SessionState>,
    favorites_cache: Mutex<Option<(Identity, Favorites)>>,
}

impl SessionManager {
    /// Creates a manager in the anonymous state without reading storage.
    pub fn new(store: Arc<ScopedStore>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            store,
            credentials,
            state: RwLock::new(SessionState::Anonymous),
            favorites_cache: Mutex::new(None),
        }
    }

    /// Creates a manager from the durable session record.
    ///
    /// A missing or malformed record yields the anonymous state.
    pub async fn restore(store: Arc<ScopedStore>, credentials: Arc<dyn CredentialSource>) -> Self {
        let state = match store.session_record().await {
            Some(record) => match Identity::new(&record.username) {
                Ok(identity) => {
                    tracing::info!("Restored session for '{}'", identity);
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    tracing::warn!("Ignoring session record: {}", e);
                    SessionState::Anonymous
                }
            },
            None => SessionState::Anonymous,
        };

        let manager = Self::new(store, credentials);
        *manager.state.write().await = state;
        manager
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.state.read().await.identity().cloned()
    }

    /// Authenticates and switches to the new identity.
    ///
    /// On rejection the current state is left untouched and
    /// `MarqueeError::AuthRejected` is returned.
    pub async fn login(&self, username: &str, credential: &str) -> Result<Identity> {
        let identity = match self.credentials.authenticate(username, credential).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::info!("Login rejected for '{}'", username.trim());
                return Err(e);
            }
        };

        {
            let mut state = self.state.write().await;
            *state = SessionState::Authenticated(identity.clone());
            self.favorites_cache.lock().await.take();
        }
        self.store
            .save_session_record(&SessionRecord {
                username: identity.as_str().to_string(),
            })
            .await;

        tracing::info!("Logged in as '{}'", identity);
        Ok(identity)
    }

    /// Returns to the anonymous state. Per-user records are kept.
    pub async fn logout(&self) {
        let previous = {
            let mut state = self.state.write().await;
            self.favorites_cache.lock().await.take();
            std::mem::take(&mut *state)
        };
        self.store.clear_session_record().await;

        if let Some(identity) = previous.identity() {
            tracing::info!("Logged out '{}'", identity);
        }
    }

    // ============================================================================
    // Routed preference accessors
    // ============================================================================

    pub async fn favorites(&self) -> Favorites {
        let Some(identity) = self.current_identity().await else {
            return Favorites::new();
        };

        let mut cache = self.favorites_cache.lock().await;
        if let Some((cached_for, favorites)) = cache.as_ref() {
            if *cached_for == identity {
                return favorites.clone();
            }
        }

        let favorites = self.store.favorites(&identity).await;
        *cache = Some((identity, favorites.clone()));
        favorites
    }

    /// Adds a favorite for the current identity. No-op while anonymous.
    pub async fn add_favorite(&self, item: Item) -> bool {
        let Some(identity) = self.current_identity().await else {
            return false;
        };
        let mut cache = self.favorites_cache.lock().await;
        let changed = self.store.add_favorite(&identity, item).await;
        cache.take();
        changed
    }

    /// Removes a favorite for the current identity. No-op while anonymous.
    pub async fn remove_favorite(&self, id: ItemId) -> bool {
        let Some(identity) = self.current_identity().await else {
            return false;
        };
        let mut cache = self.favorites_cache.lock().await;
        let changed = self.store.remove_favorite(&identity, id).await;
        cache.take();
        changed
    }

    pub async fn is_favorite(&self, id: ItemId) -> bool {
        self.favorites().await.contains(id)
    }

    /// Adds or removes `item` and returns whether it is now a favorite.
    ///
    /// Always `false` while anonymous.
    pub async fn toggle_favorite(&self, item: Item) -> bool {
        let Some(identity) = self.current_identity().await else {
            return false;
        };
        let mut cache = self.favorites_cache.lock().await;
        let now_favorite = self.store.toggle_favorite(&identity, item).await;
        cache.take();
        now_favorite
    }

    pub async fn recent_searches(&self) -> RecentSearches {
        match self.current_identity().await {
            Some(identity) => self.store.recent_searches(&identity).await,
            None => RecentSearches::new(),
        }
    }

    /// Records a search for the current identity. No-op while anonymous.
    pub async fn add_recent_search(&self, query: &str) -> bool {
        match self.current_identity().await {
            Some(identity) => self.store.add_recent_search(&identity, query).await,
            None => false,
        }
    }
}
