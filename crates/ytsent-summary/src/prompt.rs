//! Summary prompt construction.

/// Build the instruction prompt for a summary request.
///
/// The comments are embedded one per line under their sentiment heading.
/// The prompt pins the reply to a single JSON object with three two-line
/// string fields, which is what [`crate::extract_summary`] reads back.
#[must_use]
pub fn build_prompt(positive: &[String], negative: &[String]) -> String {
    format!(
        r#"Analyze the YouTube comments below and reply with ONLY a JSON object in exactly this shape:
{{
  "positive": "LINE 1\nLINE 2",
  "negative": "LINE 1\nLINE 2",
  "summary": "LINE 1\nLINE 2"
}}
RULES:
- Every field is one JSON string holding EXACTLY TWO LINES of plain text.
- Never return a JSON array and never use [] brackets.
- No bullet points, emojis, or markdown.
- Nothing before or after the JSON object.

Positive comments:
{positive}

Negative comments:
{negative}
"#,
        positive = positive.join("\n"),
        negative = negative.join("\n"),
    )
}
