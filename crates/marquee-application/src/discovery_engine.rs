//! Async orchestration of the discovery state machine.

use std::sync::Arc;

use marquee_core::catalog::{CatalogClient, Item, ItemId};
use marquee_core::discovery::{
    ApplyOutcome, DiscoverySnapshot, DiscoveryState, DiscoveryStatus, FetchTicket,
};
use marquee_core::error::Result;
use tokio::sync::{Mutex, watch};

/// Drives `DiscoveryState` against a `CatalogClient`.
///
/// The state lock is never held across a remote call, so a new query can be
/// issued while a fetch is outstanding; the superseded response is dropped
/// when it arrives. Every applied change is published to subscribers.
pub struct DiscoveryEngine {
    client: Arc<dyn CatalogClient>,
    state: Mutex<DiscoveryState>,
    snapshots: watch::Sender<DiscoverySnapshot>,
}

impl DiscoveryEngine {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        let state = DiscoveryState::new();
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            client,
            state: Mutex::new(state),
            snapshots,
        }
    }

    /// Switches mode from user-entered text and loads the first page.
    ///
    /// Blank text selects trending. The accumulated list is always reset,
    /// even when `query` equals the current one.
    pub async fn set_query(&self, query: &str) -> DiscoverySnapshot {
        let ticket = {
            let mut state = self.state.lock().await;
            let ticket = state.begin_query(query);
            self.publish(&state);
            ticket
        };
        tracing::info!("Discovery mode -> {:?} (generation {})", ticket.mode, ticket.generation);
        self.run(ticket).await
    }

    /// Loads and appends the next page.
    ///
    /// Does nothing while a fetch is in flight or when the last page has
    /// been loaded; the current snapshot is returned either way.
    pub async fn load_next_page(&self) -> DiscoverySnapshot {
        let ticket = {
            let mut state = self.state.lock().await;
            match state.begin_next_page() {
                Some(ticket) => {
                    self.publish(&state);
                    ticket
                }
                None => return state.snapshot(),
            }
        };
        self.run(ticket).await
    }

    /// Clears results and reloads the first trending page.
    pub async fn reset(&self) -> DiscoverySnapshot {
        let ticket = {
            let mut state = self.state.lock().await;
            let ticket = state.begin_reset();
            self.publish(&state);
            ticket
        };
        tracing::info!("Discovery reset (generation {})", ticket.generation);
        self.run(ticket).await
    }

    /// Fetches the detail payload for `id`.
    ///
    /// If the item is part of the current accumulation it is refreshed in
    /// place and subscribers are notified.
    pub async fn item_detail(&self, id: ItemId) -> Result<Item> {
        let item = self.client.item_detail(id).await?;
        let mut state = self.state.lock().await;
        if state.refresh_item(item.clone()) {
            self.publish(&state);
        }
        Ok(item)
    }

    pub fn snapshot(&self) -> DiscoverySnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription {
            receiver: self.snapshots.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.snapshots.receiver_count()
    }

    async fn run(&self, ticket: FetchTicket) -> DiscoverySnapshot {
        tracing::debug!(
            "Fetching page {} of {:?} (generation {})",
            ticket.page,
            ticket.mode,
            ticket.generation
        );
        let outcome = self.client.fetch_page(&ticket.mode, ticket.page).await;

        let mut state = self.state.lock().await;
        match state.apply(&ticket, outcome) {
            ApplyOutcome::Applied => {
                if let Some(reason) = failure_reason(&state) {
                    tracing::warn!("Page {} failed: {}", ticket.page, reason);
                }
                self.publish(&state);
            }
            ApplyOutcome::Stale => {
                tracing::debug!(
                    "Dropped stale response (generation {}, current {})",
                    ticket.generation,
                    state.generation()
                );
            }
        }
        state.snapshot()
    }

    fn publish(&self, state: &DiscoveryState) {
        self.snapshots.send_replace(state.snapshot());
    }
}

fn failure_reason(state: &DiscoveryState) -> Option<&str> {
    match state.status() {
        DiscoveryStatus::Failed { reason, .. } => Some(reason.as_str()),
        _ => None,
    }
}

/// A live view of discovery state changes.
///
/// Dropping the subscription, or calling [`StateSubscription::unsubscribe`],
/// ends it.
pub struct StateSubscription {
    receiver: watch::Receiver<DiscoverySnapshot>,
}

impl StateSubscription {
    /// Waits for the next published snapshot.
    ///
    /// Intermediate snapshots published while the caller was busy are
    /// coalesced into the latest one. Returns `None` once the engine is gone.
    pub async fn changed(&mut self) -> Option<DiscoverySnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> DiscoverySnapshot {
        self.receiver.borrow().clone()
    }

    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marquee_core::catalog::Page;
    use marquee_core::discovery::DiscoveryMode;
    use marquee_core::error::MarqueeError;

    /// Serves `total_pages` pages of 20 items for any mode; fails on demand.
    struct PagedClient {
        total_pages: u32,
        fail_page: Option<u32>,
    }

    #[async_trait]
    impl CatalogClient for PagedClient {
        async fn trending(&self, page: u32) -> Result<Page> {
            self.serve(1_000, page)
        }

        async fn search(&self, _query: &str, page: u32) -> Result<Page> {
            self.serve(0, page)
        }

        async fn item_detail(&self, id: ItemId) -> Result<Item> {
            let mut item = Item::new(id, "Detailed");
            item.detail = Some(Default::default());
            Ok(item)
        }
    }

    impl PagedClient {
        fn serve(&self, offset: u64, page: u32) -> Result<Page> {
            if self.fail_page == Some(page) {
                return Err(MarqueeError::network("connection reset"));
            }
            let start = offset + u64::from(page - 1) * 20;
            let items = (start..start + 20)
                .map(|id| Item::new(id, format!("Item {}", id)))
                .collect();
            Ok(Page::new(items, page, self.total_pages))
        }
    }

    fn engine(total_pages: u32, fail_page: Option<u32>) -> DiscoveryEngine {
        DiscoveryEngine::new(Arc::new(PagedClient {
            total_pages,
            fail_page,
        }))
    }

    #[tokio::test]
    async fn test_pages_accumulate_until_last() {
        let engine = engine(3, None);
        let snapshot = engine.set_query("batman").await;
        assert_eq!(snapshot.items.len(), 20);
        assert!(snapshot.has_more());

        engine.load_next_page().await;
        let snapshot = engine.load_next_page().await;
        assert_eq!(snapshot.items.len(), 60);
        assert!(!snapshot.has_more());

        let unchanged = engine.load_next_page().await;
        assert_eq!(unchanged.items.len(), 60);
        assert_eq!(unchanged.generation, snapshot.generation);
    }

    #[tokio::test]
    async fn test_failure_preserves_items_and_is_retryable() {
        let engine = engine(5, Some(2));
        engine.set_query("batman").await;
        let snapshot = engine.load_next_page().await;

        assert_eq!(snapshot.items.len(), 20);
        assert!(matches!(
            snapshot.status,
            DiscoveryStatus::Failed { retryable: true, .. }
        ));
        assert_eq!(snapshot.page, 1);
    }

    #[tokio::test]
    async fn test_reset_returns_to_trending() {
        let engine = engine(2, None);
        engine.set_query("alien").await;
        let snapshot = engine.reset().await;
        assert_eq!(snapshot.mode, DiscoveryMode::Trending);
        assert_eq!(snapshot.items[0].id, 1_000);
    }

    #[tokio::test]
    async fn test_item_detail_refreshes_accumulated_item() {
        let engine = engine(1, None);
        engine.set_query("").await;

        let mut subscription = engine.subscribe();
        let item = engine.item_detail(1_005).await.unwrap();
        assert!(item.detail.is_some());

        let snapshot = subscription.changed().await.unwrap();
        assert_eq!(snapshot.items[5].title, "Detailed");
        assert_eq!(snapshot.items.len(), 20);
    }

    #[tokio::test]
    async fn test_subscription_sees_final_state_and_unsubscribes() {
        let engine = engine(1, None);
        let mut subscription = engine.subscribe();
        assert_eq!(engine.subscriber_count(), 1);

        engine.set_query("dune").await;
        let snapshot = subscription.changed().await.unwrap();
        assert_eq!(snapshot.status, DiscoveryStatus::Loaded);
        assert_eq!(subscription.current(), engine.snapshot());

        subscription.unsubscribe();
        assert_eq!(engine.subscriber_count(), 0);
    }
}
