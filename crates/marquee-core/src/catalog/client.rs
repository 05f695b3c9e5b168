//! Remote catalog port.

use async_trait::async_trait;

use crate::catalog::model::{Item, ItemId, Page};
use crate::discovery::DiscoveryMode;
use crate::error::Result;

/// Typed access to the remote catalog.
///
/// Implementations hold no discovery state; every call maps to exactly one
/// remote request. Timeouts, connectivity problems and non-2xx responses are
/// reported as `MarqueeError::NetworkFailure`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches one page of the trending list.
    async fn trending(&self, page: u32) -> Result<Page>;

    /// Fetches one page of search results for `query`.
    async fn search(&self, query: &str, page: u32) -> Result<Page>;

    /// Fetches a single item with its detail payload attached.
    async fn item_detail(&self, id: ItemId) -> Result<Item>;

    /// Fetches the page that `mode` selects.
    async fn fetch_page(&self, mode: &DiscoveryMode, page: u32) -> Result<Page> {
        match mode {
            DiscoveryMode::Trending => self.trending(page).await,
            DiscoveryMode::Search { query } => self.search(query, page).await,
        }
    }
}
