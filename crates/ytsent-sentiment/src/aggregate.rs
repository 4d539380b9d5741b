//! Partition comments by label and compute the percentage split.

use serde::Serialize;

use crate::classifier::SentimentLabel;

/// Comments partitioned by label. The three lists are disjoint and their
/// lengths sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub total: usize,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

/// Share of each label in percent. All zero when there were no comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PercentageBreakdown {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl PercentageBreakdown {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_tally(tally: &SentimentTally) -> Self {
        if tally.total == 0 {
            return Self::default();
        }
        let total = tally.total as f64;
        let share = |n: usize| 100.0 * n as f64 / total;
        Self {
            positive: share(tally.positive.len()),
            negative: share(tally.negative.len()),
            neutral: share(tally.neutral.len()),
        }
    }
}

/// Classify each comment once and partition them.
#[must_use]
pub fn aggregate<F>(comments: Vec<String>, classify: F) -> (SentimentTally, PercentageBreakdown)
where
    F: Fn(&str) -> SentimentLabel,
{
    let mut tally = SentimentTally {
        total: comments.len(),
        ..SentimentTally::default()
    };

    for comment in comments {
        match classify(&comment) {
            SentimentLabel::Positive => tally.positive.push(comment),
            SentimentLabel::Negative => tally.negative.push(comment),
            SentimentLabel::Neutral => tally.neutral.push(comment),
        }
    }

    let percentages = PercentageBreakdown::from_tally(&tally);
    (tally, percentages)
}
