//! Application layer: discovery orchestration and per-user preferences.

pub mod discovery_engine;
pub mod explorer;
pub mod scoped_store;
pub mod session_manager;

pub use discovery_engine::{DiscoveryEngine, StateSubscription};
pub use explorer::ExplorerUseCase;
pub use scoped_store::ScopedStore;
pub use session_manager::SessionManager;
