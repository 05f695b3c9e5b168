//! Shared fakes for application integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use marquee_application::{DiscoveryEngine, ExplorerUseCase, ScopedStore, SessionManager};
use marquee_core::catalog::{CatalogClient, Item, ItemId, Page};
use marquee_core::error::{MarqueeError, Result};
use marquee_core::session::StaticCredentialSource;
use marquee_infrastructure::InMemoryKeyValueStore;
use tokio::sync::Semaphore;

pub const TRENDING: &str = "";

/// Deterministic pages for one listing.
#[derive(Clone, Copy)]
struct Listing {
    first_id: u64,
    page_size: u64,
    total_pages: u32,
    /// Items each page repeats from the end of the previous page.
    overlap: u64,
}

/// A scripted catalog.
///
/// Listings are keyed by query text, with `TRENDING` for the trending list.
/// A key can be held so that its requests block until released, which lets
/// tests interleave overlapping fetches deterministically.
#[derive(Default)]
pub struct FakeCatalog {
    listings: Mutex<HashMap<String, Listing>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    failures: Mutex<HashMap<(String, u32), MarqueeError>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn listing(&self, key: &str, first_id: u64, page_size: u64, total_pages: u32) {
        self.listing_with_overlap(key, first_id, page_size, total_pages, 0);
    }

    pub fn listing_with_overlap(
        &self,
        key: &str,
        first_id: u64,
        page_size: u64,
        total_pages: u32,
        overlap: u64,
    ) {
        self.listings.lock().unwrap().insert(
            key.to_string(),
            Listing {
                first_id,
                page_size,
                total_pages,
                overlap,
            },
        );
    }

    /// Makes the next request for `(key, page)` fail with `error`.
    pub fn fail_once(&self, key: &str, page: u32, error: MarqueeError) {
        self.failures
            .lock()
            .unwrap()
            .insert((key.to_string(), page), error);
    }

    /// Blocks requests for `key` until [`FakeCatalog::release`] is called.
    pub fn hold(&self, key: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::new(Semaphore::new(0)));
    }

    /// Lets one held request for `key` proceed.
    pub fn release(&self, key: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(key) {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Waits until at least `count` requests have been received.
    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("catalog was not called in time");
    }

    async fn serve(&self, key: &str, page: u32) -> Result<Page> {
        self.calls.lock().unwrap().push((key.to_string(), page));

        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if let Some(error) = self.failures.lock().unwrap().remove(&(key.to_string(), page)) {
            return Err(error);
        }

        let listing = self.listings.lock().unwrap().get(key).copied();
        let Some(listing) = listing else {
            return Ok(Page::new(Vec::new(), page, 1));
        };
        let step = listing.page_size - listing.overlap;
        let start = listing.first_id + u64::from(page - 1) * step;
        let items = (start..start + listing.page_size)
            .map(|id| Item::new(id, format!("{} #{}", key, id)))
            .collect();
        Ok(Page::new(items, page, listing.total_pages))
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn trending(&self, page: u32) -> Result<Page> {
        self.serve(TRENDING, page).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page> {
        self.serve(query, page).await
    }

    async fn item_detail(&self, id: ItemId) -> Result<Item> {
        let mut item = Item::new(id, format!("Detail #{}", id));
        item.detail = Some(Default::default());
        Ok(item)
    }
}

/// A fully wired explorer over in-memory storage.
pub struct Harness {
    pub catalog: Arc<FakeCatalog>,
    pub backing: InMemoryKeyValueStore,
    pub explorer: ExplorerUseCase,
}

impl Harness {
    pub async fn new(catalog: Arc<FakeCatalog>) -> Self {
        Self::with_backing(catalog, InMemoryKeyValueStore::new()).await
    }

    pub async fn with_backing(catalog: Arc<FakeCatalog>, backing: InMemoryKeyValueStore) -> Self {
        let store = Arc::new(ScopedStore::new(Arc::new(backing.clone())));
        let session = Arc::new(
            SessionManager::restore(store, Arc::new(StaticCredentialSource::demo())).await,
        );
        let engine = Arc::new(DiscoveryEngine::new(catalog.clone()));
        Self {
            catalog,
            backing,
            explorer: ExplorerUseCase::new(engine, session),
        }
    }

    pub fn engine(&self) -> &Arc<DiscoveryEngine> {
        self.explorer.engine()
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        self.explorer.session()
    }
}

pub fn ids(items: &[Item]) -> Vec<u64> {
    items.iter().map(|item| item.id).collect()
}
