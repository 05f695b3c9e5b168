//! Presentation-facing intents.
//!
//! `ExplorerUseCase` is what a screen or command talks to: it forwards
//! discovery intents to the engine and preference intents to the session,
//! and links the two where a single user action touches both.

use std::sync::Arc;

use marquee_core::catalog::{Item, ItemId};
use marquee_core::discovery::DiscoverySnapshot;
use marquee_core::error::Result;

use crate::discovery_engine::DiscoveryEngine;
use crate::session_manager::SessionManager;

pub struct ExplorerUseCase {
    engine: Arc<DiscoveryEngine>,
    session: Arc<SessionManager>,
}

impl ExplorerUseCase {
    pub fn new(engine: Arc<DiscoveryEngine>, session: Arc<SessionManager>) -> Self {
        Self { engine, session }
    }

    pub fn engine(&self) -> &Arc<DiscoveryEngine> {
        &self.engine
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The search box changed (submitted). Non-blank queries are remembered
    /// for the current user before the first page is requested.
    pub async fn on_query_changed(&self, query: &str) -> DiscoverySnapshot {
        if !query.trim().is_empty() {
            self.session.add_recent_search(query).await;
        }
        self.engine.set_query(query).await
    }

    /// The user scrolled to the end or pressed "load more".
    pub async fn on_load_more_requested(&self) -> DiscoverySnapshot {
        self.engine.load_next_page().await
    }

    pub async fn on_reset_requested(&self) -> DiscoverySnapshot {
        self.engine.reset().await
    }

    /// Opens an item's detail view.
    pub async fn on_item_opened(&self, id: ItemId) -> Result<Item> {
        self.engine.item_detail(id).await
    }

    /// Flips favorite membership; returns whether `item` is now a favorite.
    pub async fn on_favorite_toggled(&self, item: Item) -> bool {
        self.session.toggle_favorite(item).await
    }
}
