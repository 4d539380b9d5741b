//! Generative summaries of classified comments.
//!
//! Builds the summary prompt, sends it to Gemini, and turns the loosely
//! structured reply into a [`SummaryBundle`]. Extraction never fails: a reply
//! that cannot be parsed becomes a bundle of fixed placeholder sentences.

pub mod client;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod types;

pub use client::SummaryClient;
pub use credentials::{GeminiCredentials, StagedCredentials};
pub use error::SummaryError;
pub use extract::{extract_summary, ExtractError};
pub use prompt::build_prompt;
pub use types::{SummaryBundle, SummaryOutcome};
