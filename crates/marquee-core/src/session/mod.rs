//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: `Identity` and `SessionState`
//! - `credentials`: the `CredentialSource` port and a static allow-list

mod credentials;
mod model;

pub use credentials::{CredentialSource, StaticCredentialSource};
pub use model::{Identity, SessionState};
