//! Catalog domain module.
//!
//! # Module Structure
//!
//! - `model`: items, detail payloads and pages
//! - `client`: the `CatalogClient` port implemented by the infrastructure layer

mod client;
mod model;

pub use client::CatalogClient;
pub use model::{
    CastMember, Item, ItemDetail, ItemId, POSTER_BASE_URL, Page, Trailer, UNAVAILABLE,
    parse_release_date,
};
