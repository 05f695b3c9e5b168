pub mod account;
pub mod discover;
pub mod favorites;
