use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use research_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn decodes_json_body_and_sends_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(query_param("q", "a&b c"))
        .and(header("accept", "application/json"))
        .and(header("x-subscription-token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [1, 2]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert("accept", HeaderValue::from_static("application/json"));
    let got: Value = client
        .get_json(
            "v1/items",
            RequestOpts {
                headers: Some(headers),
                auth: Some(Auth::Header {
                    name: HeaderName::from_static("x-subscription-token"),
                    value: HeaderValue::from_static("tok"),
                }),
                query: Some(vec![("q", "a&b c".into())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got, json!({"items": [1, 2]}));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("anything", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("not json")),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_surfaces_api_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("x-request-id", "abc123")
                .set_body_json(json!({"message": "try later"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("busy", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status,
            message,
            request_id,
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "try later");
            assert_eq!(request_id, "abc123");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_server_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client
        .get_json::<Value>("slow", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout(d) if d == Duration::from_millis(100)));
}
