//! Uniform entry points over three search backends.
//!
//! | call              | backend                                   | error        |
//! |-------------------|-------------------------------------------|--------------|
//! | [`search_x`]      | `bird search <query> --json` subprocess   | [`BirdError`] |
//! | [`search_reddit`] | `GET /r/<community>/search.json?q=`       | [`HttpError`] |
//! | [`search_brave`]  | `GET /res/v1/web/search?q=` (Brave)       | [`HttpError`] |
//!
//! Every call returns the backend's JSON untouched as a [`serde_json::Value`].
//! Nothing is retried, cached, or merged across backends. For configured
//! clients build a [`Researcher`]; synchronous callers use [`blocking`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let tweets = research_skill::search_x("rust async").await?;
//! let posts = research_skill::search_reddit("rust", "tokio").await?;
//! let pages = research_skill::search_brave("tokio runtime").await?;
//! # let _ = (tweets, posts, pages);
//! # Ok(()) }
//! ```
use research_config::ResearchConfig;
use serde_json::Value;
use thiserror::Error;

pub mod blocking;

pub use research_config::{ResearchConfigLoader, default_config_path};
pub use research_http::HttpError;
pub use research_social::{BirdCli, BirdError, RedditApi};
pub use research_web::{BraveApi, Credential};

/// Either backend failure, carried unchanged.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Bird(#[from] BirdError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl SearchError {
    /// True when a backend answered but its output was not valid JSON.
    pub fn is_decode(&self) -> bool {
        match self {
            SearchError::Bird(e) => e.is_decode(),
            SearchError::Http(e) => e.is_decode(),
            SearchError::Runtime(_) => false,
        }
    }
}

/// The three clients, configured once and reused across calls.
#[derive(Clone, Debug)]
pub struct Researcher {
    bird: BirdCli,
    reddit: RedditApi,
    brave: BraveApi,
}

impl Researcher {
    /// Clients with built-in defaults (public endpoints, 30s timeouts).
    pub fn new() -> Result<Self, SearchError> {
        Self::from_config(&ResearchConfig::default())
    }

    pub fn from_config(cfg: &ResearchConfig) -> Result<Self, SearchError> {
        let bird = BirdCli::new()
            .with_binary(&cfg.bird.binary)
            .with_timeout(cfg.bird.timeout());

        let reddit = RedditApi::with_base(&cfg.reddit.base_url)?
            .with_timeout(cfg.reddit.timeout())
            .with_user_agent(&cfg.reddit.user_agent)?;

        let credential = match &cfg.brave.api_key {
            Some(key) => Credential::Static(key.clone()),
            None => Credential::Env(cfg.brave.api_key_env.clone()),
        };
        let brave = BraveApi::with_base(&cfg.brave.base_url)?
            .with_timeout(cfg.brave.timeout())
            .with_credential(credential);

        tracing::debug!(
            bird_binary = %cfg.bird.binary,
            reddit_base = %cfg.reddit.base_url,
            brave_base = %cfg.brave.base_url,
            "researcher.configured"
        );
        Ok(Self {
            bird,
            reddit,
            brave,
        })
    }

    pub async fn search_x(&self, query: &str) -> Result<Value, SearchError> {
        Ok(self.bird.search(query).await?)
    }

    pub async fn search_reddit(&self, subreddit: &str, query: &str) -> Result<Value, SearchError> {
        Ok(self.reddit.search(subreddit, query).await?)
    }

    pub async fn search_brave(&self, query: &str) -> Result<Value, SearchError> {
        Ok(self.brave.search(query).await?)
    }
}

/// Search X/Twitter through `bird` on `PATH`.
pub async fn search_x(query: &str) -> Result<Value, BirdError> {
    BirdCli::new().search(query).await
}

/// Search one Reddit community.
pub async fn search_reddit(subreddit: &str, query: &str) -> Result<Value, HttpError> {
    RedditApi::new()?.search(subreddit, query).await
}

/// Brave web search; the token is read from `BRAVE_API_KEY` on this call.
pub async fn search_brave(query: &str) -> Result<Value, HttpError> {
    BraveApi::new()?.search(query).await
}
