use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate the sentiment model artifacts.
///
/// Every structural problem surfaces here, at load time, so classification
/// itself never fails.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),

    #[error("inconsistent model artifacts: {0}")]
    Inconsistent(String),
}
