//! `YouTube` Data API v3 response types.
//!
//! Only the fields the comment fetcher reads are modelled. Everything else in
//! the payload is ignored by serde.

use serde::Deserialize;

/// Response of `commentThreads.list`.
#[derive(Debug, Deserialize)]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(default, rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// One thread: a top-level comment plus (unrequested) replies.
#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
pub struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: Comment,
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
pub struct CommentSnippet {
    /// The comment as the author typed it, before HTML rendering.
    #[serde(rename = "textOriginal")]
    pub text_original: String,
}

/// Google's standard error envelope: `{"error": {"code": 403, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}
