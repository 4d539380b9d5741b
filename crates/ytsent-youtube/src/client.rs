//! HTTP client for the `YouTube` Data API v3 `commentThreads` endpoint.
//!
//! Wraps `reqwest` with API key management, Google error-envelope decoding and
//! typed response deserialization. One call fetches one page; there is no
//! retry and no pagination.

use std::time::Duration;

use reqwest::Client;
use url::Url;
use ytsent_core::MAX_COMMENT_PAGE_SIZE;

use crate::error::YoutubeError;
use crate::types::{CommentThreadListResponse, ErrorEnvelope};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Client for the `YouTube` Data API.
///
/// Use [`YoutubeClient::new`] for production or [`YoutubeClient::with_base_url`]
/// to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Trailing slash so `join("commentThreads")` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_owned(),
            base_url,
        })
    }

    /// Fetches up to `limit` top-level comments for a video.
    ///
    /// `limit` is clamped to `1..=100`, the endpoint's page-size ceiling.
    /// Each comment's `textOriginal` is returned trimmed, in the order the
    /// API returned them.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::MissingApiKey`] if the client has no API key.
    /// - [`YoutubeError::Api`] on a non-2xx status (invalid key, exhausted
    ///   quota, comments disabled, unknown video).
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch_comments(
        &self,
        video_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, YoutubeError> {
        if self.api_key.is_empty() {
            return Err(YoutubeError::MissingApiKey);
        }

        let max_results = limit.clamp(1, MAX_COMMENT_PAGE_SIZE);
        let url = self.comment_threads_url(video_id, max_results);

        let response = self.client.get(url).send().await.map_err(redact_url)?;
        let status = response.status();
        let body = response.text().await.map_err(redact_url)?;

        if !status.is_success() {
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let page: CommentThreadListResponse =
            serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
                context: format!("commentThreads(videoId={video_id})"),
                source: e,
            })?;

        let comments: Vec<String> = page
            .items
            .into_iter()
            .map(|item| {
                item.snippet
                    .top_level_comment
                    .snippet
                    .text_original
                    .trim()
                    .to_string()
            })
            .collect();

        tracing::debug!(
            video_id,
            count = comments.len(),
            more_pages = page.next_page_token.is_some(),
            "fetched comment page"
        );

        Ok(comments)
    }

    /// Builds the `commentThreads` request URL with percent-encoded query
    /// parameters.
    fn comment_threads_url(&self, video_id: &str, max_results: u32) -> Url {
        let mut url = self
            .base_url
            .join("commentThreads")
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("videoId", video_id)
            .append_pair("key", &self.api_key)
            .append_pair("maxResults", &max_results.to_string());
        url
    }
}

/// The request URL carries the API key in its query string, so it never
/// travels with the error.
fn redact_url(error: reqwest::Error) -> YoutubeError {
    YoutubeError::Http(error.without_url())
}

/// Pulls `error.message` out of a Google error body, falling back to the raw
/// body (truncated) when it is not the standard envelope.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
