//! Per-request analysis: fetch, classify, aggregate, summarise.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use ytsent_core::AppConfig;
use ytsent_summary::{
    extract_summary, GeminiCredentials, SummaryBundle, SummaryClient, SummaryError,
};
use ytsent_youtube::{extract_video_id, YoutubeClient, YoutubeError};

use crate::aggregate::{aggregate, PercentageBreakdown};
use crate::model::SentimentModel;

pub const MISSING_YOUTUBE_KEY: &str = "YouTube API key not set in environment variables.";
pub const MISSING_GEMINI_CREDENTIALS: &str = "Gemini credentials not set in environment \
     variables (GEMINI_API_KEY or GOOGLE_APPLICATION_CREDENTIALS_JSON).";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A secret the request needs was never configured.
    #[error("{0}")]
    Configuration(String),

    #[error("comment fetch failed: {0}")]
    Youtube(#[from] YoutubeError),

    #[error("summary request failed: {0}")]
    Summary(#[from] SummaryError),
}

impl AnalysisError {
    /// True when an external service failed, as opposed to local setup.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Youtube(_) | Self::Summary(_))
    }

    /// Message safe to show to end users. Upstream detail stays in the logs.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Configuration(message) => message.clone(),
            Self::Youtube(YoutubeError::Api { status, .. }) => {
                format!("Fetching comments from YouTube failed (HTTP {status}).")
            }
            Self::Youtube(_) => "Fetching comments from YouTube failed.".to_string(),
            Self::Summary(SummaryError::Api { status, .. }) => {
                format!("Generating the comment summary failed (HTTP {status}).")
            }
            Self::Summary(_) => "Generating the comment summary failed.".to_string(),
        }
    }
}

/// Outcome of analysing one submitted link.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub link: String,
    pub video_id: Option<String>,
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub percentages: PercentageBreakdown,
    pub summary: SummaryBundle,
}

impl AnalysisReport {
    /// Report for a link with no recognisable video id.
    #[must_use]
    pub fn empty(link: &str) -> Self {
        Self {
            link: link.to_string(),
            video_id: None,
            total: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            percentages: PercentageBreakdown::default(),
            summary: SummaryBundle::default(),
        }
    }
}

/// Runs the analysis pipeline against a shared model and optional upstream
/// clients. A client is `None` when its credentials are not configured.
pub struct Analyzer {
    model: Arc<SentimentModel>,
    youtube: Option<YoutubeClient>,
    summarizer: Option<SummaryClient>,
    comment_limit: u32,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        model: Arc<SentimentModel>,
        youtube: Option<YoutubeClient>,
        summarizer: Option<SummaryClient>,
        comment_limit: u32,
    ) -> Self {
        Self {
            model,
            youtube,
            summarizer,
            comment_limit,
        }
    }

    /// Build the upstream clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Youtube`] or [`AnalysisError::Summary`] if an
    /// HTTP client cannot be constructed. Missing secrets are not an error
    /// here.
    pub fn from_config(
        config: &AppConfig,
        model: Arc<SentimentModel>,
    ) -> Result<Self, AnalysisError> {
        let youtube = config
            .youtube_api_key
            .as_deref()
            .map(|key| {
                YoutubeClient::with_base_url(
                    key,
                    config.request_timeout_secs,
                    &config.user_agent,
                    &config.youtube_base_url,
                )
            })
            .transpose()?;

        let summarizer = GeminiCredentials::from_parts(
            config.gemini_api_key.as_deref(),
            config.google_credentials_json.as_deref(),
        )
        .map(|credentials| {
            SummaryClient::with_base_url(
                credentials,
                &config.gemini_model,
                config.request_timeout_secs,
                &config.user_agent,
                &config.gemini_base_url,
            )
        })
        .transpose()?;

        if youtube.is_none() {
            tracing::warn!("YOUTUBE_API_KEY not set; analysis requests will fail");
        }
        if summarizer.is_none() {
            tracing::warn!("no Gemini credentials set; analysis requests will fail");
        }

        Ok(Self::new(model, youtube, summarizer, config.comment_limit))
    }

    #[must_use]
    pub fn youtube_configured(&self) -> bool {
        self.youtube.is_some()
    }

    #[must_use]
    pub fn summarizer_configured(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Analyse one submitted link.
    ///
    /// A link without a recognisable video id yields an empty report and no
    /// upstream call.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Configuration`] if the YouTube key or the Gemini
    ///   credentials are missing. Checked before any upstream call.
    /// - [`AnalysisError::Youtube`] if the comment fetch fails.
    /// - [`AnalysisError::Summary`] if the summary call fails. An unparseable
    ///   summary reply is not an error; it degrades to placeholder text.
    pub async fn analyze(&self, link: Option<&str>) -> Result<AnalysisReport, AnalysisError> {
        let link_text = link.unwrap_or_default();
        let Some(video_id) = extract_video_id(link) else {
            tracing::info!(link = link_text, "no video id in link");
            return Ok(AnalysisReport::empty(link_text));
        };

        let youtube = self
            .youtube
            .as_ref()
            .ok_or_else(|| AnalysisError::Configuration(MISSING_YOUTUBE_KEY.to_string()))?;
        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or_else(|| AnalysisError::Configuration(MISSING_GEMINI_CREDENTIALS.to_string()))?;

        let comments = youtube.fetch_comments(&video_id, self.comment_limit).await?;
        let (tally, percentages) = aggregate(comments, |c| self.model.classify(c));

        tracing::info!(
            video_id = %video_id,
            total = tally.total,
            positive = tally.positive.len(),
            negative = tally.negative.len(),
            neutral = tally.neutral.len(),
            "comments classified"
        );

        let raw = summarizer
            .request_summary(&tally.positive, &tally.negative)
            .await?;
        let summary = extract_summary(&raw).into_bundle();

        Ok(AnalysisReport {
            link: link_text.to_string(),
            video_id: Some(video_id),
            total: tally.total,
            positive_count: tally.positive.len(),
            negative_count: tally.negative.len(),
            neutral_count: tally.neutral.len(),
            percentages,
            summary,
        })
    }
}
