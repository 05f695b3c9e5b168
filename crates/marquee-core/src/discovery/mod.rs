//! Discovery: trending/search accumulation over a paginated catalog.

mod model;
mod state;

pub use model::{DiscoveryMode, DiscoverySnapshot, DiscoveryStatus};
pub use state::{ApplyOutcome, DiscoveryState, FetchKind, FetchTicket};
