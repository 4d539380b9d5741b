use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The call succeeded but carried no candidate text (e.g. a blocked prompt).
    #[error("Gemini returned no text: {0}")]
    EmptyResponse(String),

    #[error("credential staging failed: {0}")]
    Staging(#[from] std::io::Error),

    #[error("service account authentication failed: {0}")]
    Credentials(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
