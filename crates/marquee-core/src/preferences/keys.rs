//! Storage key derivation.
//!
//! Every per-user key has the shape `user_{identity}_{logical}`. The identity
//! is escaped (`%` → `%25`, `_` → `%5F`) so the first unescaped `_` after the
//! prefix always ends the identity, and two different `(identity, logical)`
//! pairs can never produce the same key.

/// Key of the single current-session record.
pub const SESSION_KEY: &str = "session";

/// Logical name of a per-user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalName {
    Favorites,
    RecentSearches,
}

impl LogicalName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::RecentSearches => "recent_searches",
        }
    }
}

/// Derives the storage key for `logical` owned by `identity`.
pub fn scoped_key(identity: &str, logical: LogicalName) -> String {
    format!("user_{}_{}", escape_identity(identity), logical.as_str())
}

fn escape_identity(identity: &str) -> String {
    let mut escaped = String::with_capacity(identity.len());
    for ch in identity.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            '_' => escaped.push_str("%5F"),
            other => escaped.push(other),
        }
    }
    escaped
}
