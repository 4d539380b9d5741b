//! Gemini credentials and scoped staging of service-account material.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::SummaryError;

/// How summary requests authenticate against Gemini.
#[derive(Clone)]
pub enum GeminiCredentials {
    /// Sent as the `x-goog-api-key` header.
    ApiKey(String),
    /// Raw service-account JSON, exchanged for an OAuth token per request.
    ServiceAccountJson(String),
}

impl GeminiCredentials {
    /// Pick credentials from the configured secrets. An API key wins when
    /// both are present.
    #[must_use]
    pub fn from_parts(api_key: Option<&str>, service_account_json: Option<&str>) -> Option<Self> {
        api_key
            .map(|key| Self::ApiKey(key.to_string()))
            .or_else(|| service_account_json.map(|json| Self::ServiceAccountJson(json.to_string())))
    }
}

impl std::fmt::Debug for GeminiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey([redacted])"),
            Self::ServiceAccountJson(_) => f.write_str("ServiceAccountJson([redacted])"),
        }
    }
}

/// Service-account JSON written to a temporary file for the lifetime of this
/// guard. The file is removed when the guard drops, on every exit path.
#[derive(Debug)]
pub struct StagedCredentials {
    file: NamedTempFile,
}

impl StagedCredentials {
    /// Stage `json` in the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Staging`] if the file cannot be created or written.
    pub fn stage(json: &str) -> Result<Self, SummaryError> {
        Self::stage_in(&std::env::temp_dir(), json)
    }

    /// Stage `json` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Staging`] if the file cannot be created or written.
    pub fn stage_in(dir: &Path, json: &str) -> Result<Self, SummaryError> {
        let mut file = tempfile::Builder::new()
            .prefix("ytsent-gcp-")
            .suffix(".json")
            .tempfile_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
