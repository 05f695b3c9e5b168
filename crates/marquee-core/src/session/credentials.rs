//! Credential verification port and the built-in demo allow-list.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{MarqueeError, Result};
use crate::session::model::Identity;

/// Verifies a username/credential pair.
///
/// The session model is a trusted local claim, so implementations only decide
/// whether the pair is accepted; there is no token or expiry.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Returns the identity for an accepted pair, or
    /// `MarqueeError::AuthRejected` otherwise.
    async fn authenticate(&self, username: &str, credential: &str) -> Result<Identity>;
}

/// Fixed in-memory allow-list of username/credential pairs.
///
/// # Example
///
/// ```
/// use marquee_core::session::StaticCredentialSource;
///
/// let source = StaticCredentialSource::demo();
/// assert!(source.contains("alice"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialSource {
    accounts: HashMap<String, String>,
}

impl StaticCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two demo accounts: `alice`/`alice123` and `bob`/`bob123`.
    pub fn demo() -> Self {
        Self::new()
            .with_account("alice", "alice123")
            .with_account("bob", "bob123")
    }

    pub fn with_account(mut self, username: impl Into<String>, credential: impl Into<String>) -> Self {
        self.accounts.insert(username.into(), credential.into());
        self
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn authenticate(&self, username: &str, credential: &str) -> Result<Identity> {
        let username = username.trim();
        match self.accounts.get(username) {
            Some(expected) if expected == credential => Identity::new(username),
            _ => Err(MarqueeError::auth_rejected(username)),
        }
    }
}
