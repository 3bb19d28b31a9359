//! Web discovery through commercial search APIs.
//!
//! - Brave Search API client (`brave`), web vertical only
pub mod brave;

pub use brave::{BraveApi, Credential};
