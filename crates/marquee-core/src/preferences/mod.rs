//! Per-user preferences: favorites and recent searches.
//!
//! # Module Structure
//!
//! - `model`: `Favorites` and `RecentSearches` collections with their invariants
//! - `keys`: storage key derivation scoped by identity
//! - `codec`: typed encode/decode for every persisted record

mod codec;
mod keys;
mod model;

pub use codec::{Record, SessionRecord};
pub use keys::{LogicalName, SESSION_KEY, scoped_key};
pub use model::{Favorites, RECENT_SEARCH_LIMIT, RecentSearches};
