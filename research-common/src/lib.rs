//! Shared defaults and utilities for the research-skill crates.
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - Constants every search backend agrees on (timeouts, user agent)
//!
//! ```rust
//! use research_common::{DEFAULT_TIMEOUT, USER_AGENT};
//!
//! assert_eq!(DEFAULT_TIMEOUT.as_secs(), 30);
//! assert_eq!(USER_AGENT, "research-skill/1.0");
//! ```
use std::time::Duration;

pub mod observability;

/// Seconds a single search call may take before it is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// [`DEFAULT_TIMEOUT_SECS`] as a [`Duration`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Identifying `User-Agent` sent to the forum search endpoint.
pub const USER_AGENT: &str = "research-skill/1.0";

/// Truncate `text` to at most `max` bytes on a char boundary, appending `...` when cut.
///
/// Used wherever raw payloads end up in logs or error messages.
pub fn snippet(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_keeps_short_text() {
        assert_eq!(snippet("{\"data\":[]}", 500), "{\"data\":[]}");
    }

    #[test]
    fn snippet_cuts_on_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it.
        let s = snippet("aébc", 2);
        assert_eq!(s, "a...");
    }
}
