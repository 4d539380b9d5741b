//! Lenient parsing of the model's summary reply.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{SummaryBundle, SummaryOutcome};

/// Why a reply could not be read as a summary object.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no {{...}} span in model output")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON value is not an object")]
    NotAnObject,

    #[error("field `{field}` is neither a string nor a list of strings")]
    UnexpectedFieldType { field: &'static str },
}

/// Read a model reply into a [`SummaryOutcome`].
///
/// Takes the widest span from the first `{` to the last `}`, so prose or code
/// fences around the object are ignored. Missing or null fields become empty
/// strings. Lists of strings are joined with newlines. Any other failure
/// yields [`SummaryOutcome::Fallback`] with placeholder text and is logged
/// together with the raw reply.
#[must_use]
pub fn extract_summary(raw: &str) -> SummaryOutcome {
    match parse_bundle(raw) {
        Ok(bundle) => SummaryOutcome::Parsed(bundle),
        Err(reason) => {
            tracing::warn!(
                error = %reason,
                raw_output = raw,
                "could not parse summary JSON; using placeholders"
            );
            SummaryOutcome::Fallback {
                bundle: SummaryBundle::placeholder(),
                reason,
            }
        }
    }
}

fn parse_bundle(raw: &str) -> Result<SummaryBundle, ExtractError> {
    let span = json_object_span(raw).ok_or(ExtractError::NoJsonObject)?;
    let value: Value = serde_json::from_str(span)?;
    let Value::Object(object) = value else {
        return Err(ExtractError::NotAnObject);
    };

    Ok(SummaryBundle {
        positive: field_text(&object, "positive")?,
        negative: field_text(&object, "negative")?,
        overall: field_text(&object, "summary")?,
    })
}

fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn field_text(object: &Map<String, Value>, field: &'static str) -> Result<String, ExtractError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(|lines| lines.join("\n"))
            .ok_or(ExtractError::UnexpectedFieldType { field }),
        Some(_) => Err(ExtractError::UnexpectedFieldType { field }),
    }
}
