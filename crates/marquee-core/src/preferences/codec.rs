//! Typed serialization boundary for persisted records.
//!
//! The key/value port stores plain strings. Every record type that crosses it
//! implements [`Record`], so JSON handling stays in this module and callers
//! only ever see decoded domain values.

use serde::{Deserialize, Serialize};

use crate::catalog::Item;
use crate::error::{MarqueeError, Result};
use crate::preferences::model::{Favorites, RecentSearches};

/// A value persisted under a single key.
pub trait Record: Sized {
    /// Encodes the record for storage.
    fn encode(&self) -> Result<String>;

    /// Decodes a stored value. `key` is only used for error reporting.
    ///
    /// Malformed input yields `MarqueeError::StorageCorrupt`.
    fn decode(key: &str, raw: &str) -> Result<Self>;
}

fn decode_json<T>(key: &str, raw: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(raw).map_err(|e| MarqueeError::storage_corrupt(key, e.to_string()))
}

impl Record for Favorites {
    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self.items())?)
    }

    fn decode(key: &str, raw: &str) -> Result<Self> {
        let items: Vec<Item> = decode_json(key, raw)?;
        Ok(Favorites::from_items(items))
    }
}

impl Record for RecentSearches {
    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self.queries())?)
    }

    /// Re-applies the list invariants so a hand-edited or foreign record
    /// (duplicates, blanks, more than five entries) still decodes to a valid
    /// list.
    fn decode(key: &str, raw: &str) -> Result<Self> {
        let stored: Vec<String> = decode_json(key, raw)?;
        let mut recent = RecentSearches::new();
        for query in stored.iter().rev() {
            recent.record(query);
        }
        Ok(recent)
    }
}

/// The durable current-session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
}

impl Record for SessionRecord {
    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn decode(key: &str, raw: &str) -> Result<Self> {
        let record: SessionRecord = decode_json(key, raw)?;
        if record.username.trim().is_empty() {
            return Err(MarqueeError::storage_corrupt(key, "empty username"));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorites_wire_format_is_item_array() {
        let favorites = Favorites::from_items(vec![Item::new(1, "Alien")]);
        let encoded = favorites.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["title"], "Alien");

        let decoded = Favorites::decode("k", &encoded).unwrap();
        assert_eq!(decoded, favorites);
    }

    #[test]
    fn test_recent_searches_wire_format_is_string_array() {
        let mut recent = RecentSearches::new();
        recent.record("alien");
        recent.record("dune");
        assert_eq!(recent.encode().unwrap(), r#"["dune","alien"]"#);
    }

    #[test]
    fn test_recent_searches_decode_normalizes() {
        let raw = r#"["a", "b", "a", " ", "c", "d", "e", "f", "g"]"#;
        let recent = RecentSearches::decode("k", raw).unwrap();
        assert_eq!(recent.queries(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_malformed_value_is_storage_corrupt() {
        let err = Favorites::decode("user_alice_favorites", "{not json").unwrap_err();
        assert!(err.is_storage_corrupt());

        let err = RecentSearches::decode("user_alice_recent_searches", r#"{"q": 1}"#).unwrap_err();
        assert!(err.is_storage_corrupt());
    }

    #[test]
    fn test_session_record_rejects_blank_username() {
        let err = SessionRecord::decode("session", r#"{"username": "  "}"#).unwrap_err();
        assert!(err.is_storage_corrupt());

        let record = SessionRecord::decode("session", r#"{"username": "alice"}"#).unwrap();
        assert_eq!(record.username, "alice");
    }
}
