//! File-backed key/value store.
//!
//! All keys live in a single JSON object (`store.json`). Every write is a
//! locked read-modify-write of the whole document followed by an atomic
//! rename, so concurrent processes never lose each other's keys.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::error::{MarqueeError, Result};
use marquee_core::store::KeyValueStore;

use crate::paths::MarqueePaths;
use crate::storage::{AtomicJsonFile, OnCorrupt};

type Document = BTreeMap<String, String>;

/// A `KeyValueStore` persisted to one JSON file.
///
/// File I/O runs on the blocking pool. An unreadable document is reported as
/// `StorageCorrupt` by `get`; the next write moves it aside and starts over.
#[derive(Clone)]
pub struct FileKeyValueStore {
    file: Arc<AtomicJsonFile<Document>>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path).with_on_corrupt(OnCorrupt::Quarantine)),
        }
    }

    /// Opens the store at its default location.
    pub fn from_paths(paths: &MarqueePaths) -> Result<Self> {
        Ok(Self::new(paths.store_file()?))
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    async fn run_blocking<F, R>(&self, key: &str, f: F) -> Result<R>
    where
        F: FnOnce(&AtomicJsonFile<Document>) -> std::result::Result<R, crate::storage::AtomicJsonError>
            + Send
            + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        let owned_key = key.to_string();
        tokio::task::spawn_blocking(move || f(&file).map_err(|e| e.into_marquee(&owned_key)))
            .await
            .map_err(|e| MarqueeError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let lookup = key.to_string();
        self.run_blocking(key, move |file| {
            Ok(file.load()?.and_then(|mut document| document.remove(&lookup)))
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let owned_key = key.to_string();
        self.run_blocking(key, move |file| {
            file.update(Document::new(), |document| {
                document.insert(owned_key, value);
                Ok(())
            })
        })
        .await?;
        tracing::debug!("Stored key '{}'", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let owned_key = key.to_string();
        let removed = self
            .run_blocking(key, move |file| {
                file.update(Document::new(), |document| {
                    Ok(document.remove(&owned_key).is_some())
                })
            })
            .await?;
        if removed {
            tracing::debug!("Removed key '{}'", key);
        }
        Ok(())
    }
}
