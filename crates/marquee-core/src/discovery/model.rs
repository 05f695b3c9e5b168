//! Discovery domain models.

use serde::{Deserialize, Serialize};

use crate::catalog::Item;

/// Which remote list is being accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoveryMode {
    #[default]
    Trending,
    /// Search results; `query` is never empty.
    Search { query: String },
}

impl DiscoveryMode {
    /// Maps user-entered text to a mode. Blank text selects `Trending`.
    pub fn from_query(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            Self::Trending
        } else {
            Self::Search {
                query: trimmed.to_string(),
            }
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Trending => None,
            Self::Search { query } => Some(query),
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search { .. })
    }
}

/// Fetch status shown to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiscoveryStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed {
        reason: String,
        /// Re-issuing the same intent may succeed.
        retryable: bool,
    },
}

impl DiscoveryStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Immutable view of the discovery state at one point in time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoverySnapshot {
    pub mode: DiscoveryMode,
    /// Accumulated items in arrival order, unique by identifier.
    pub items: Vec<Item>,
    /// Cursor of the page most recently requested or loaded.
    pub page: u32,
    pub total_pages: u32,
    pub status: DiscoveryStatus,
    pub generation: u64,
}

impl DiscoverySnapshot {
    /// Whether another page can be requested right now.
    pub fn has_more(&self) -> bool {
        !self.status.is_loading() && self.page < self.total_pages
    }
}
