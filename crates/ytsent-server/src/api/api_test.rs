use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytsent_sentiment::{Analyzer, SentimentModel};
use ytsent_summary::{GeminiCredentials, SummaryClient};
use ytsent_youtube::YoutubeClient;

use super::*;

fn model() -> Arc<SentimentModel> {
    let dir = tempfile::tempdir().expect("tempdir");
    let write = |name: &str, value: serde_json::Value| {
        std::fs::write(dir.path().join(name), value.to_string()).expect("write artifact");
    };
    write("vectorizer.json", json!({ "vocabulary": { "love": 0, "hate": 1 } }));
    write(
        "label_encoder.json",
        json!({ "classes": ["Negative", "Neutral", "Positive"] }),
    );
    write(
        "model.json",
        json!({
            "kind": "linear",
            "classes": [0, 1, 2],
            "coef": [[-2.0, 2.0], [0.0, 0.0], [2.0, -2.0]],
            "intercept": [0.0, 0.5, 0.0]
        }),
    );
    Arc::new(SentimentModel::load(dir.path()).expect("model loads"))
}

fn app_with(youtube: Option<YoutubeClient>, summarizer: Option<SummaryClient>) -> Router {
    build_app(AppState {
        analyzer: Arc::new(Analyzer::new(model(), youtube, summarizer, 100)),
    })
}

fn unconfigured_app() -> Router {
    app_with(None, None)
}

fn configured_app(server: &MockServer) -> Router {
    let youtube = YoutubeClient::with_base_url("yt-key", 5, "ytsent-test/0.1", &server.uri())
        .expect("youtube client");
    let summarizer = SummaryClient::with_base_url(
        GeminiCredentials::ApiKey("gemini-key".to_string()),
        "models/gemini-2.5-flash",
        5,
        "ytsent-test/0.1",
        &server.uri(),
    )
    .expect("summary client");
    app_with(Some(youtube), Some(summarizer))
}

async fn mount_upstreams(server: &MockServer) {
    let items: Vec<_> = ["love it", "love this", "hate that", "first"]
        .iter()
        .map(|text| {
            json!({ "snippet": { "topLevelComment": { "snippet": { "textOriginal": text } } } })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{
                "text": "{\"positive\":\"Fans love it.\\nVery helpful.\",\"negative\":\"Some hate.\\nMinor.\",\"summary\":\"Well received.\\nFew gripes.\"}"
            }] } }]
        })))
        .mount(server)
        .await;
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, headers, String::from_utf8(body.to_vec()).expect("utf-8 body"))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request")
}

#[test]
fn api_error_upstream_maps_to_bad_gateway() {
    let response = ApiError::new("req-1", "upstream_error", "quota exceeded").into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_configuration_error_maps_to_internal_error() {
    let response =
        ApiError::new("req-1", "configuration_error", "missing key").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn every_response_carries_no_cache_headers() {
    for request in [
        get_request("/"),
        post_form("/", ""),
        get_request("/dashboard"),
        get_request("/api/v1/health"),
    ] {
        let (status, headers, _) = send(unconfigured_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-cache, no-store, must-revalidate, max-age=0")
        );
        assert_eq!(
            headers.get(header::PRAGMA).and_then(|v| v.to_str().ok()),
            Some("no-cache")
        );
        assert_eq!(
            headers.get(header::EXPIRES).and_then(|v| v.to_str().ok()),
            Some("0")
        );
        assert!(headers.contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn home_page_serves_link_form() {
    let (status, headers, body) = send(unconfigured_app(), get_request("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html")));
    assert!(body.contains(r#"name="youtube_link""#));
}

#[tokio::test]
async fn dashboard_without_link_renders_zeros() {
    let (status, _, body) = send(unconfigured_app(), get_request("/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<div class="value">0</div>"#));
    assert!(body.contains("0.0%"));
}

#[tokio::test]
async fn dashboard_with_unsupported_link_makes_no_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (status, _, body) = send(
        configured_app(&server),
        get_request("/dashboard?link=https%3A%2F%2Fvimeo.com%2F42"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://vimeo.com/42"));
    assert!(body.contains("0.0%"));
}

#[tokio::test]
async fn missing_youtube_key_is_500_with_message() {
    let (status, _, body) = send(
        unconfigured_app(),
        post_form("/dashboard", "youtube_link=https%3A%2F%2Fyoutu.be%2Fabc"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("YouTube API key not set in environment variables."));
}

#[tokio::test]
async fn dashboard_post_renders_analysis() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;

    let (status, _, body) = send(
        configured_app(&server),
        post_form(
            "/dashboard",
            "youtube_link=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc123",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body.contains(r#"<div class="value">4</div>"#));
    assert!(body.contains("50.0%"));
    assert!(body.contains("25.0%"));
    assert!(body.contains("Fans love it.<br>\nVery helpful."));
    assert!(body.contains("Well received.<br>\nFew gripes."));
}

#[tokio::test]
async fn dashboard_form_field_takes_priority_over_query() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;

    let (status, _, body) = send(
        configured_app(&server),
        post_form(
            "/dashboard?link=https%3A%2F%2Fvimeo.com%2F1",
            "youtube_link=https%3A%2F%2Fyoutu.be%2Fabc123",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://youtu.be/abc123"));
    assert!(body.contains(r#"<div class="value">4</div>"#));
}

#[tokio::test]
async fn dashboard_upstream_failure_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "quotaExceeded" }
        })))
        .mount(&server)
        .await;

    let (status, _, body) = send(
        configured_app(&server),
        get_request("/dashboard?link=https%3A%2F%2Fyoutu.be%2Fabc123"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Fetching comments from YouTube failed (HTTP 403)."));
    assert!(!body.contains("quotaExceeded"));
}

fn unreachable_youtube_app() -> Router {
    // Nothing listens on port 1, so every comment fetch is refused.
    let youtube =
        YoutubeClient::with_base_url("SECRET-YT-KEY", 5, "ytsent-test/0.1", "http://127.0.0.1:1")
            .expect("youtube client");
    let summarizer = SummaryClient::with_base_url(
        GeminiCredentials::ApiKey("gemini-key".to_string()),
        "models/gemini-2.5-flash",
        5,
        "ytsent-test/0.1",
        "http://127.0.0.1:1",
    )
    .expect("summary client");
    app_with(Some(youtube), Some(summarizer))
}

#[tokio::test]
async fn dashboard_network_failure_does_not_expose_api_key() {
    let (status, _, body) = send(
        unreachable_youtube_app(),
        get_request("/dashboard?link=https%3A%2F%2Fyoutu.be%2Fabc123"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body.contains("SECRET-YT-KEY"), "body: {body}");
    assert!(body.contains("Fetching comments from YouTube failed."));
}

#[tokio::test]
async fn analysis_api_network_failure_does_not_expose_api_key() {
    let (status, _, body) = send(
        unreachable_youtube_app(),
        get_request("/api/v1/analysis?link=https%3A%2F%2Fyoutu.be%2Fabc123"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body.contains("SECRET-YT-KEY"), "body: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["error"]["code"], "upstream_error");
    assert_eq!(
        json["error"]["message"],
        "Fetching comments from YouTube failed."
    );
}

#[tokio::test]
async fn analysis_api_returns_envelope() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;

    let (status, _, body) = send(
        configured_app(&server),
        get_request("/api/v1/analysis?link=https%3A%2F%2Fyoutu.be%2Fabc123"),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["data"]["video_id"], "abc123");
    assert_eq!(json["data"]["total"], 4);
    assert_eq!(json["data"]["positive_count"], 2);
    assert_eq!(json["data"]["percentages"]["positive"], 50.0);
    assert_eq!(json["data"]["summary"]["overall"], "Well received.\nFew gripes.");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn analysis_api_requires_link() {
    let (status, _, body) = send(unconfigured_app(), get_request("/api/v1/analysis")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn analysis_api_missing_key_is_configuration_error() {
    let (status, _, body) = send(
        unconfigured_app(),
        get_request("/api/v1/analysis?link=https%3A%2F%2Fyoutu.be%2Fabc123"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["error"]["code"], "configuration_error");
    assert_eq!(
        json["error"]["message"],
        "YouTube API key not set in environment variables."
    );
}

#[tokio::test]
async fn health_reports_missing_credentials() {
    let (status, _, body) = send(unconfigured_app(), get_request("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["data"]["status"], "degraded");
    assert_eq!(json["data"]["youtube"], "missing");
}
