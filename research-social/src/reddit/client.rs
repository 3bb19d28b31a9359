//! Thin client for `GET /r/<community>/search.json?q=<query>`.
//!
//! The community name becomes one percent-encoded path segment and the query is
//! form-encoded into `q`, so `&`, `#` and spaces reach Reddit intact.
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use research_common::{USER_AGENT as DEFAULT_USER_AGENT, snippet};
use research_http::{HttpClient, HttpError, RequestOpts};
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

pub const REDDIT_BASE: &str = "https://www.reddit.com";

#[derive(Clone, Debug)]
pub struct RedditApi {
    http: HttpClient,
    user_agent: HeaderValue,
}

impl RedditApi {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_base(REDDIT_BASE)
    }

    /// Point the client at another host (mirrors, tests).
    pub fn with_base(base: &str) -> Result<Self, HttpError> {
        let http = HttpClient::new(base)?;
        Ok(Self {
            http,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self, HttpError> {
        self.user_agent =
            HeaderValue::from_str(user_agent).map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(self)
    }

    /// `<base>/r/<subreddit>/search.json`, without the query string.
    ///
    /// ```
    /// use research_social::RedditApi;
    ///
    /// let api = RedditApi::new().unwrap();
    /// let url = api.search_endpoint("rust").unwrap();
    /// assert_eq!(url.as_str(), "https://www.reddit.com/r/rust/search.json");
    ///
    /// // A slash cannot escape the community segment.
    /// let url = api.search_endpoint("rust/../admin").unwrap();
    /// assert_eq!(url.path(), "/r/rust%2F..%2Fadmin/search.json");
    ///
    /// // Dot segments would be collapsed by the URL parser.
    /// assert!(api.search_endpoint("..").is_err());
    /// ```
    pub fn search_endpoint(&self, subreddit: &str) -> Result<Url, HttpError> {
        if matches!(subreddit, "" | "." | "..") {
            return Err(HttpError::Url(format!(
                "invalid community name: {subreddit:?}"
            )));
        }
        let mut url = self.http.base().clone();
        url.path_segments_mut()
            .map_err(|_| HttpError::Url(format!("cannot append path to {}", self.http.base())))?
            .pop_if_empty()
            .extend(["r", subreddit, "search.json"]);
        Ok(url)
    }

    /// Search one community and return Reddit's listing JSON as-is.
    pub async fn search(&self, subreddit: &str, query: &str) -> Result<Value, HttpError> {
        let endpoint = self.search_endpoint(subreddit)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.clone());

        let query_snippet = snippet(query, 160);
        let started = Instant::now();
        tracing::info!(
            target: "social.reddit",
            subreddit = %subreddit,
            query = %query_snippet,
            "reddit.search.start"
        );

        let result = self
            .http
            .get_json::<Value>(
                endpoint.as_str(),
                RequestOpts {
                    headers: Some(headers),
                    query: Some(vec![("q", query.into())]),
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(
                target: "social.reddit",
                subreddit = %subreddit,
                query = %query_snippet,
                elapsed_ms,
                "reddit.search.success"
            ),
            Err(e) => tracing::warn!(
                target: "social.reddit",
                subreddit = %subreddit,
                query = %query_snippet,
                elapsed_ms,
                error = %e,
                "reddit.search.error"
            ),
        }
        result
    }
}
