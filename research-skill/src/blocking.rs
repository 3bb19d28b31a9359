//! Synchronous forms of the top-level searches.
//!
//! Each call drives its search to completion on a private current-thread Tokio
//! runtime. Do not call these from inside an async context; Tokio panics when a
//! runtime is started on a thread that is already running one.
use crate::{Researcher, SearchError};
use serde_json::Value;
use std::future::Future;

fn run<F: Future>(fut: F) -> Result<F::Output, SearchError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(fut))
}

pub fn search_x(query: &str) -> Result<Value, SearchError> {
    Ok(run(crate::search_x(query))??)
}

pub fn search_reddit(subreddit: &str, query: &str) -> Result<Value, SearchError> {
    Ok(run(crate::search_reddit(subreddit, query))??)
}

pub fn search_brave(query: &str) -> Result<Value, SearchError> {
    Ok(run(crate::search_brave(query))??)
}

impl Researcher {
    /// Blocking [`Researcher::search_x`].
    pub fn search_x_blocking(&self, query: &str) -> Result<Value, SearchError> {
        run(self.search_x(query))?
    }

    /// Blocking [`Researcher::search_reddit`].
    pub fn search_reddit_blocking(&self, subreddit: &str, query: &str) -> Result<Value, SearchError> {
        run(self.search_reddit(subreddit, query))?
    }

    /// Blocking [`Researcher::search_brave`].
    pub fn search_brave_blocking(&self, query: &str) -> Result<Value, SearchError> {
        run(self.search_brave(query))?
    }
}
