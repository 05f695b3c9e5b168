//! The discovery state machine.
//!
//! `DiscoveryState` is synchronous and owns no I/O. An operation that needs a
//! remote page returns a [`FetchTicket`]; the caller performs the request and
//! hands the outcome back to [`DiscoveryState::apply`], which drops it if a
//! newer ticket has been issued in the meantime.

use std::collections::HashSet;

use crate::catalog::{Item, ItemId, Page};
use crate::discovery::model::{DiscoveryMode, DiscoverySnapshot, DiscoveryStatus};
use crate::error::{MarqueeError, Result};

/// How a fetched page is merged into the accumulated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Replace the accumulated list (first page of a mode).
    Reset,
    /// Append to the accumulated list ("load more").
    Append,
}

/// A request the caller must perform on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub mode: DiscoveryMode,
    pub page: u32,
    pub kind: FetchKind,
}

/// Result of handing a fetch outcome back to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The state changed.
    Applied,
    /// The ticket was superseded; the state is untouched.
    Stale,
}

/// Discovery state: mode, accumulated items, cursor and status.
#[derive(Debug, Clone)]
pub struct DiscoveryState {
    mode: DiscoveryMode,
    items: Vec<Item>,
    seen: HashSet<ItemId>,
    page: u32,
    total_pages: u32,
    status: DiscoveryStatus,
    generation: u64,
}

impl Default for DiscoveryState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryState {
    /// Creates an idle state in trending mode with nothing loaded.
    pub fn new() -> Self {
        Self {
            mode: DiscoveryMode::Trending,
            items: Vec::new(),
            seen: HashSet::new(),
            page: 0,
            total_pages: 1,
            status: DiscoveryStatus::Idle,
            generation: 0,
        }
    }

    pub fn mode(&self) -> &DiscoveryMode {
        &self.mode
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn status(&self) -> &DiscoveryStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switches to the mode selected by `query` and requests its first page.
    ///
    /// Always clears the accumulated list, even when the query is unchanged,
    /// and supersedes any fetch still in flight.
    pub fn begin_query(&mut self, query: &str) -> FetchTicket {
        self.begin_mode(DiscoveryMode::from_query(query))
    }

    /// Explicit reset: back to trending, first page.
    pub fn begin_reset(&mut self) -> FetchTicket {
        self.begin_mode(DiscoveryMode::Trending)
    }

    fn begin_mode(&mut self, mode: DiscoveryMode) -> FetchTicket {
        self.mode = mode;
        self.items.clear();
        self.seen.clear();
        self.page = 1;
        self.total_pages = 1;
        self.issue(FetchKind::Reset)
    }

    /// Requests the next page of the current mode.
    ///
    /// Returns `None` (and leaves the state untouched) while a fetch is in
    /// flight or when the last known page has already been loaded.
    pub fn begin_next_page(&mut self) -> Option<FetchTicket> {
        if self.status.is_loading() || self.page >= self.total_pages {
            return None;
        }
        self.page += 1;
        Some(self.issue(FetchKind::Append))
    }

    fn issue(&mut self, kind: FetchKind) -> FetchTicket {
        self.generation += 1;
        self.status = DiscoveryStatus::Loading;
        FetchTicket {
            generation: self.generation,
            mode: self.mode.clone(),
            page: self.page,
            kind,
        }
    }

    /// Merges the outcome of `ticket` into the state.
    ///
    /// A ticket whose generation is not the current one is dropped. On
    /// failure the accumulated items are kept and the cursor steps back so
    /// that requesting the next page retries the one that failed.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: Result<Page>) -> ApplyOutcome {
        if ticket.generation != self.generation {
            return ApplyOutcome::Stale;
        }

        match outcome {
            Ok(page) => {
                if ticket.kind == FetchKind::Reset {
                    self.items.clear();
                    self.seen.clear();
                }
                for item in page.items {
                    if self.seen.insert(item.id) {
                        self.items.push(item);
                    }
                }
                self.page = ticket.page;
                self.total_pages = page.total_pages.max(1);
                self.status = DiscoveryStatus::Loaded;
            }
            Err(err) => {
                self.page = ticket.page.saturating_sub(1);
                self.status = failed_status(&err);
            }
        }
        ApplyOutcome::Applied
    }

    /// Replaces an accumulated item in place, keeping its position.
    ///
    /// Used to attach a lazily fetched detail payload. Returns `false` when
    /// the item is not part of the current accumulation.
    pub fn refresh_item(&mut self, item: Item) -> bool {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> DiscoverySnapshot {
        DiscoverySnapshot {
            mode: self.mode.clone(),
            items: self.items.clone(),
            page: self.page,
            total_pages: self.total_pages,
            status: self.status.clone(),
            generation: self.generation,
        }
    }
}

fn failed_status(err: &MarqueeError) -> DiscoveryStatus {
    DiscoveryStatus::Failed {
        reason: err.to_string(),
        retryable: err.is_retryable(),
    }
}
