//! Comment sentiment analysis for ytsent.
//!
//! Replays an exported TF-IDF vectorizer and classifier to label each comment
//! Positive, Negative or Neutral, tallies the labels, and drives the
//! per-request pipeline from a video link to an [`AnalysisReport`].

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod vectorizer;

pub use aggregate::{aggregate, PercentageBreakdown, SentimentTally};
pub use classifier::SentimentLabel;
pub use error::ModelError;
pub use model::SentimentModel;
pub use pipeline::{AnalysisError, AnalysisReport, Analyzer};
