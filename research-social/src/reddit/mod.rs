//! Reddit community search via the public JSON endpoint.
pub mod client;

pub use client::{REDDIT_BASE, RedditApi};
