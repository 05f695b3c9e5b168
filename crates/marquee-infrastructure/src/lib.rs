pub mod config_service;
pub mod dto;
pub mod file_key_value_store;
pub mod memory_key_value_store;
pub mod paths;
pub mod storage;
pub mod tmdb_catalog_client;

pub use crate::config_service::ConfigService;
pub use crate::file_key_value_store::FileKeyValueStore;
pub use crate::memory_key_value_store::InMemoryKeyValueStore;
pub use crate::paths::MarqueePaths;
pub use crate::tmdb_catalog_client::TmdbCatalogClient;
