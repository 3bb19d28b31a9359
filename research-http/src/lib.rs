//! Minimal JSON-over-HTTP client with safe logging and per-request timeouts.
//!
//! - Request options: headers, `Auth`, query params, timeout
//! - Redacts sensitive headers and query params; never logs secret values
//! - Exactly one attempt per call; failures are returned, not retried
//! - Optional *raw* request/response logging via `RESEARCH_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), research_http::HttpError> {
//! let client = research_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", research_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `RESEARCH_HTTP_RAW=1`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use research_common::{DEFAULT_TIMEOUT, snippet};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "RESEARCH_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

const SECRET_HEADERS: &[&str] = &[
    "authorization",
    "x-subscription-token",
    "x-api-key",
    "cookie",
];

const SECRET_QUERY_KEYS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_header(name: &str) -> bool {
    SECRET_HEADERS
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

fn is_secret_query_key(key: &str) -> bool {
    SECRET_QUERY_KEYS
        .iter()
        .any(|k| key.eq_ignore_ascii_case(k))
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    let (host_path, query) = redact_query(url);
    let query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let scheme = url.scheme();
    if query.is_empty() {
        parts.push(format!("'{scheme}://{host_path}'"));
    } else {
        parts.push(format!("'{scheme}://{host_path}?{query}'"));
    }
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_secret_header(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

/// "host + path" and the redacted query list, for logging.
fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = if is_secret_query_key(&k) {
                "<redacted>".to_string()
            } else {
                v.to_string()
            };
            (k, v)
        })
        .collect::<Vec<_>>();
    (host_path, redacted)
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// True when the response arrived but its body was not the expected JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, HttpError::Decode(..))
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use research_http::Auth;
/// use reqwest::header::{HeaderName, HeaderValue};
///
/// let auth = Auth::Header {
///     name: HeaderName::from_static("x-subscription-token"),
///     value: HeaderValue::from_static(""),
/// };
/// assert!(matches!(auth, Auth::Header { .. }));
/// ```
#[derive(Clone, Debug)]
pub enum Auth {
    /// Custom header (e.g., Brave: X-Subscription-Token)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    None,
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use research_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("q", "rust lang".into())]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.allow_absolute == false);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("q", "term".into())]
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use research_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(30));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use research_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Base URL relative paths are joined onto.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GET JSON with per-request options (headers/query/auth/timeout).
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::GET, path, opts).await
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.resolve(path, opts.allow_absolute)?;
        if let Some(q) = opts.query.as_ref().filter(|q| !q.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in q {
                pairs.append_pair(k, v);
            }
        }

        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        // ----- Build request -----
        let mut headers = opts.headers.clone().unwrap_or_default();
        let auth_kind = match &opts.auth {
            Some(Auth::Header { name, value }) => {
                headers.insert(name.clone(), value.clone());
                "header"
            }
            Some(Auth::None) | None => "none",
        };
        let rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout)
            .headers(headers.clone());

        // ----- Safe request logging (pre-send) -----
        let (host_path, redacted_q) = redact_query(&url);
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, &url, &headers);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|err| network_error(&req_id, "send", timeout, err))?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| network_error(&req_id, "body", timeout, err))?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let req_hdr_id = resp_headers
            .get("x-request-id")
            .or_else(|| resp_headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%req_hdr_id,
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&resp_headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let body_snippet = snip_body(&bytes);
        tracing::trace!(
            req_id=%req_id,
            body_snippet=%body_snippet,
            "http.response.body_snippet"
        );

        // ----- Success path -----
        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e.to_string(),
                    body_snippet=%body_snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), body_snippet)
            });
        }

        // ----- Non-success: final error -----
        let message = extract_error_message(&bytes);
        let request_id = req_hdr_id.to_string();
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            x_request_id=%request_id,
            body_snippet=%body_snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn network_error(req_id: &str, stage: &str, timeout: Duration, err: reqwest::Error) -> HttpError {
    let message = err.to_string();
    tracing::warn!(
        req_id=%req_id,
        stage,
        timed_out=err.is_timeout(),
        message=%message,
        "http.network_error"
    );
    if err.is_timeout() {
        HttpError::Timeout(timeout)
    } else {
        HttpError::Network(message)
    }
}

fn extract_error_message(body: &[u8]) -> String {
    // Reddit: {"message": "Forbidden", "error": 403}
    // Brave:  {"error": {"detail": "...", "code": "..."}}
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        #[serde(default)]
        detail: String,
        #[serde(default)]
        message: String,
    }

    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
    }

    if let Ok(n) = serde_json::from_slice::<Nested>(body) {
        if !n.error.detail.is_empty() {
            return n.error.detail;
        }
        if !n.error.message.is_empty() {
            return n.error.message;
        }
    }
    if let Ok(m) = serde_json::from_slice::<Flat>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.detail.is_empty() {
            return m.detail;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    snippet(&String::from_utf8_lossy(body), SNIPPET_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_subscription_token_header() {
        let mut h = HeaderMap::new();
        h.insert("x-subscription-token", HeaderValue::from_static("sekrit"));
        h.insert("accept", HeaderValue::from_static("application/json"));
        let got = redact_headers(&h);
        assert!(got.contains(&("x-subscription-token".into(), "<redacted>".into())));
        assert!(got.contains(&("accept".into(), "application/json".into())));
    }

    #[test]
    fn redacts_secret_query_params() {
        let url = Url::parse("https://api.example.com/s?q=rust&api_key=abc").unwrap();
        let (host_path, q) = redact_query(&url);
        assert_eq!(host_path, "api.example.com/s");
        assert_eq!(
            q,
            vec![
                ("q".to_string(), "rust".to_string()),
                ("api_key".to_string(), "<redacted>".to_string())
            ]
        );
    }

    #[test]
    fn curl_never_contains_secret() {
        let url = Url::parse("https://api.search.brave.com/res/v1/web/search?q=x").unwrap();
        let mut h = HeaderMap::new();
        h.insert("x-subscription-token", HeaderValue::from_static("sekrit"));
        let curl = make_curl(&Method::GET, &url, &h);
        assert!(!curl.contains("sekrit"));
        assert!(curl.contains("q=x"));
    }

    #[test]
    fn error_message_prefers_structured_fields() {
        assert_eq!(
            extract_error_message(br#"{"message":"Forbidden","error":403}"#),
            "Forbidden"
        );
        assert_eq!(
            extract_error_message(br#"{"error":{"detail":"bad token","code":"X"}}"#),
            "bad token"
        );
        assert_eq!(extract_error_message(b"<html>oops</html>"), "<html>oops</html>");
    }

    #[test]
    fn resolve_honours_absolute_urls_only_when_allowed() {
        let client = HttpClient::new("https://base.example.com/").unwrap();
        let abs = client.resolve("https://other.example.com/x", true).unwrap();
        assert_eq!(abs.host_str(), Some("other.example.com"));
        let rel = client.resolve("v1/items", false).unwrap();
        assert_eq!(rel.as_str(), "https://base.example.com/v1/items");
    }
}
