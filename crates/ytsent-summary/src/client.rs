//! Gemini `generateContent` client.

use std::path::PathBuf;
use std::time::Duration;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::credentials::{GeminiCredentials, StagedCredentials};
use crate::error::SummaryError;
use crate::prompt::build_prompt;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GENERATIVE_LANGUAGE_SCOPE: &str = "https://www.googleapis.com/auth/generative-language";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client for Gemini text generation.
///
/// Every call is a single non-streaming request with no retry. With
/// service-account credentials the JSON is staged to a temp file for the
/// duration of the call and removed afterwards.
pub struct SummaryClient {
    client: Client,
    credentials: GeminiCredentials,
    endpoint: String,
    staging_dir: Option<PathBuf>,
}

impl SummaryClient {
    /// Creates a client against the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: GeminiCredentials,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SummaryError> {
        Self::with_base_url(credentials, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        credentials: GeminiCredentials,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            credentials,
            endpoint: generate_endpoint(base_url, model),
            staging_dir: None,
        })
    }

    /// Stage service-account credentials in `dir` instead of the system temp
    /// directory.
    #[must_use]
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Ask the model to summarise the positive and negative comments.
    ///
    /// Returns the raw trimmed reply text; parse it with
    /// [`crate::extract_summary`].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`SummaryClient::generate`].
    pub async fn request_summary(
        &self,
        positive: &[String],
        negative: &[String],
    ) -> Result<String, SummaryError> {
        let prompt = build_prompt(positive, negative);
        tracing::debug!(
            positive = positive.len(),
            negative = negative.len(),
            prompt_chars = prompt.len(),
            "requesting comment summary"
        );
        self.generate(&prompt).await
    }

    /// Send a single prompt and return the first candidate's text, trimmed.
    ///
    /// # Errors
    ///
    /// - [`SummaryError::Staging`] / [`SummaryError::Credentials`] if
    ///   service-account credentials cannot be staged or exchanged for a token.
    /// - [`SummaryError::Http`] on network failure.
    /// - [`SummaryError::Api`] on a non-2xx status (auth, quota, bad model).
    /// - [`SummaryError::Deserialize`] if the body is not a `generateContent`
    ///   response.
    /// - [`SummaryError::EmptyResponse`] if no candidate carries text.
    pub async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let request = self.client.post(&self.endpoint).json(&GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        });

        // `_staged` lives until the end of the call; dropping it deletes the file.
        let (request, _staged) = match &self.credentials {
            GeminiCredentials::ApiKey(key) => {
                (request.header("x-goog-api-key", key.as_str()), None)
            }
            GeminiCredentials::ServiceAccountJson(json) => {
                let staged = self.stage(json)?;
                let request = authorize(request, &staged).await?;
                (request, Some(staged))
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SummaryError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| SummaryError::Deserialize {
                context: "generateContent".to_string(),
                source: e,
            })?;

        response_text(parsed)
    }

    fn stage(&self, json: &str) -> Result<StagedCredentials, SummaryError> {
        match &self.staging_dir {
            Some(dir) => StagedCredentials::stage_in(dir, json),
            None => StagedCredentials::stage(json),
        }
    }
}

async fn authorize(
    request: RequestBuilder,
    staged: &StagedCredentials,
) -> Result<RequestBuilder, SummaryError> {
    let account = CustomServiceAccount::from_file(staged.path())
        .map_err(|e| SummaryError::Credentials(e.to_string()))?;
    let token = account
        .token(&[GENERATIVE_LANGUAGE_SCOPE])
        .await
        .map_err(|e| SummaryError::Credentials(e.to_string()))?;
    Ok(request.bearer_auth(token.as_str()))
}

/// `{base}/{model}:generateContent`, accepting the model with or without the
/// `models/` prefix.
fn generate_endpoint(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches('/');
    let model = if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    };
    format!("{}/{model}:generateContent", base_url.trim_end_matches('/'))
}

fn response_text(response: GenerateResponse) -> Result<String, SummaryError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(SummaryError::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    let text = text.trim();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "empty candidate".to_string());
        return Err(SummaryError::EmptyResponse(reason));
    }

    Ok(text.to_string())
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.chars().take(200).collect(),
    }
}
