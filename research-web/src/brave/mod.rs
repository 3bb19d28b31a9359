//! Brave Search API (`/res/v1/web/search`).
pub mod client;
pub mod credential;

pub use client::{BRAVE_BASE, BraveApi, WEB_SEARCH_PATH};
pub use credential::{API_KEY_ENV, Credential};
