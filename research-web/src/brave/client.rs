use super::credential::Credential;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use research_common::snippet;
use research_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::Value;
use std::time::{Duration, Instant};

pub const BRAVE_BASE: &str = "https://api.search.brave.com";
pub const WEB_SEARCH_PATH: &str = "res/v1/web/search";

/// Minimal client for Brave Search API (web vertical).
///
/// The response is returned as raw JSON; no `web`/`news`/`mixed` reshaping.
#[derive(Clone, Debug)]
pub struct BraveApi {
    http: HttpClient,
    credential: Credential,
}

impl BraveApi {
    /// Client against the public endpoint, token from `BRAVE_API_KEY` per call.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_base(BRAVE_BASE)
    }

    pub fn with_base(base: &str) -> Result<Self, HttpError> {
        let http = HttpClient::new(base)?;
        Ok(Self {
            http,
            credential: Credential::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// One web search. An empty or missing token is sent as-is; Brave decides.
    pub async fn search(&self, query: &str) -> Result<Value, HttpError> {
        let token = self.credential.resolve();
        let token_value =
            HeaderValue::from_str(&token).map_err(|e| HttpError::Build(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let query_snippet = snippet(query, 160);
        let started = Instant::now();
        tracing::info!(
            target: "web.brave",
            query = %query_snippet,
            has_token = !token.is_empty(),
            "brave.search.start"
        );

        let result = self
            .http
            .get_json::<Value>(
                WEB_SEARCH_PATH,
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: HeaderName::from_static("x-subscription-token"),
                        value: token_value,
                    }),
                    headers: Some(headers),
                    query: Some(vec![("q", query.into())]),
                    ..Default::default()
                },
            )
            .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(resp) => {
                tracing::info!(
                    target: "web.brave",
                    query = %query_snippet,
                    elapsed_ms,
                    "brave.search.success"
                );
                tracing::debug!(target: "web.brave", ?resp, "brave.search.response");
            }
            Err(e) => tracing::warn!(
                target: "web.brave",
                query = %query_snippet,
                elapsed_ms,
                error = %e,
                "brave.search.error"
            ),
        }
        result
    }
}
