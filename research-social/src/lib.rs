//! Social network search wrappers used by research-skill.
//!
//! - [`bird`]: X/Twitter search through the external `bird` command-line tool
//! - [`reddit`]: Reddit's public `/r/<community>/search.json` endpoint
//!
//! Both hand back the decoded JSON untouched; callers own any interpretation.
pub mod bird;
pub mod reddit;

pub use bird::{BirdCli, BirdError};
pub use reddit::RedditApi;
