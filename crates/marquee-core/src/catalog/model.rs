//! Catalog domain models.
//!
//! `Item` is also the on-disk shape of a favorite, so field names follow the
//! remote catalog (`vote_average`, `poster_path`) and the JSON arrays written
//! by earlier clients decode unchanged.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Placeholder rendered for any optional field the catalog did not supply.
pub const UNAVAILABLE: &str = "N/A";

/// Base URL for poster images.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Catalog-assigned item identifier.
pub type ItemId = u64;

/// A single catalog entry (a movie).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, with = "optional_date")]
    pub release_date: Option<NaiveDate>,
    /// Average rating on a 0-10 scale.
    #[serde(rename = "vote_average", default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Lazily fetched detail payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ItemDetail>,
}

impl Item {
    /// Creates an item with only the mandatory fields set.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: None,
            rating: None,
            poster_path: None,
            detail: None,
        }
    }

    /// Four-digit release year, or `N/A`.
    pub fn release_year(&self) -> String {
        self.release_date
            .map(|date| date.year().to_string())
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    /// Rating with one decimal place, or `N/A`.
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) if rating.is_finite() => format!("{:.1}", rating),
            _ => UNAVAILABLE.to_string(),
        }
    }

    /// Full poster URL at the given size (e.g. `w500`).
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}/{}{}", POSTER_BASE_URL, size, path))
    }
}

/// Detail payload for an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ItemDetail {
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
}

impl ItemDetail {
    pub fn overview_text(&self) -> &str {
        self.overview
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(UNAVAILABLE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

/// Reference to a trailer hosted on a video site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    pub site: String,
    pub key: String,
}

impl Trailer {
    /// Watch URL for sites we know how to link to.
    pub fn url(&self) -> Option<String> {
        match self.site.as_str() {
            "YouTube" => Some(format!("https://www.youtube.com/watch?v={}", self.key)),
            "Vimeo" => Some(format!("https://vimeo.com/{}", self.key)),
            _ => None,
        }
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    /// 1-based page index.
    pub page: u32,
    /// Total page count reported by the catalog, never less than 1.
    pub total_pages: u32,
}

impl Page {
    /// Creates a page, treating a zero total page count as a single page.
    pub fn new(items: Vec<Item>, page: u32, total_pages: u32) -> Self {
        Self {
            items,
            page,
            total_pages: total_pages.max(1),
        }
    }
}

/// `YYYY-MM-DD` or empty/absent, decoded as `Option<NaiveDate>`.
///
/// Unparseable dates decode as `None` rather than failing the whole record.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|text| super::parse_release_date(&text)))
    }
}

/// Parses a catalog release date, returning `None` for empty or malformed input.
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
