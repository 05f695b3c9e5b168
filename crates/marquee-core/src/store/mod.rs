//! Durable key/value storage port.

use async_trait::async_trait;

use crate::error::Result;

/// String-keyed durable storage.
///
/// Values are opaque strings; typed encoding lives in
/// [`crate::preferences::Record`]. Implementations must make each single call
/// atomic, but read-modify-write sequences across calls are the caller's
/// responsibility.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
