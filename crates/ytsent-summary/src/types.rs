use serde::Serialize;

use crate::extract::ExtractError;

pub const POSITIVE_PLACEHOLDER: &str = "No positive summary available.";
pub const NEGATIVE_PLACEHOLDER: &str = "No negative summary available.";
pub const OVERALL_PLACEHOLDER: &str = "No overall summary available.";

/// Three short prose summaries, each meant to be two lines.
///
/// `Default` is the all-empty bundle used when no analysis ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryBundle {
    pub positive: String,
    pub negative: String,
    pub overall: String,
}

impl SummaryBundle {
    /// The bundle shown when the model reply could not be parsed.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            positive: POSITIVE_PLACEHOLDER.to_string(),
            negative: NEGATIVE_PLACEHOLDER.to_string(),
            overall: OVERALL_PLACEHOLDER.to_string(),
        }
    }
}

/// Result of reading a model reply: either the parsed bundle, or the
/// placeholder bundle together with the reason parsing failed.
#[derive(Debug)]
pub enum SummaryOutcome {
    Parsed(SummaryBundle),
    Fallback {
        bundle: SummaryBundle,
        reason: ExtractError,
    },
}

impl SummaryOutcome {
    #[must_use]
    pub fn bundle(&self) -> &SummaryBundle {
        match self {
            Self::Parsed(bundle) | Self::Fallback { bundle, .. } => bundle,
        }
    }

    #[must_use]
    pub fn into_bundle(self) -> SummaryBundle {
        match self {
            Self::Parsed(bundle) | Self::Fallback { bundle, .. } => bundle,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}
