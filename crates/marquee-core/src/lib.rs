//! Domain layer of the Marquee catalog engine.
//!
//! Holds the models, the ports implemented by `marquee-infrastructure`
//! (`CatalogClient`, `KeyValueStore`, `CredentialSource`) and the synchronous
//! discovery state machine driven by `marquee-application`.

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod preferences;
pub mod session;
pub mod store;

// Re-export common error type
pub use error::MarqueeError;
