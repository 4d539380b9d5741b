//! Server-rendered HTML for the home page, dashboard and error pages.

use html_escape::{encode_double_quoted_attribute, encode_text};
use ytsent_sentiment::AnalysisReport;

const STYLE: &str = r"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
h1 { margin-bottom: 0.25rem; }
form { display: flex; gap: 0.5rem; margin: 1.5rem 0; }
input[type=text] { flex: 1; padding: 0.6rem; font-size: 1rem; }
button { padding: 0.6rem 1.2rem; font-size: 1rem; cursor: pointer; }
.stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; margin: 1.5rem 0; }
.stat { border: 1px solid #d9e2ec; border-radius: 8px; padding: 1rem; text-align: center; }
.stat .value { font-size: 1.8rem; font-weight: 600; }
.positive .value { color: #2f8132; }
.negative .value { color: #c62828; }
.neutral .value { color: #52606d; }
.summary { border-left: 4px solid #d9e2ec; padding: 0.5rem 1rem; margin: 1rem 0; }
.link { word-break: break-all; color: #52606d; }
";

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = encode_text(title),
    )
}

fn link_form(value: &str) -> String {
    format!(
        r#"<form method="post" action="/dashboard">
<input type="text" name="youtube_link" placeholder="https://www.youtube.com/watch?v=..." value="{value}" required>
<button type="submit">Analyze</button>
</form>"#,
        value = encode_double_quoted_attribute(value),
    )
}

/// Escape each line and join with `<br>`.
fn multiline(text: &str) -> String {
    text.lines()
        .map(|line| encode_text(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>\n")
}

#[must_use]
pub fn home() -> String {
    page(
        "YouTube Comment Sentiment",
        &format!(
            "<h1>YouTube Comment Sentiment</h1>\n<p>Paste a video link to classify its top comments and summarise what viewers think.</p>\n{}",
            link_form("")
        ),
    )
}

#[must_use]
pub fn dashboard(report: &AnalysisReport) -> String {
    let pct = &report.percentages;
    let summary = &report.summary;
    let body = format!(
        r#"<h1>Sentiment Dashboard</h1>
<p class="link">{link}</p>
{form}
<div class="stats">
<div class="stat total"><div class="label">Comments</div><div class="value">{total}</div></div>
<div class="stat positive"><div class="label">Positive</div><div class="value">{positive:.1}%</div></div>
<div class="stat negative"><div class="label">Negative</div><div class="value">{negative:.1}%</div></div>
<div class="stat neutral"><div class="label">Neutral</div><div class="value">{neutral:.1}%</div></div>
</div>
<h2>Positive feedback</h2>
<div class="summary positive-summary">{positive_summary}</div>
<h2>Negative feedback</h2>
<div class="summary negative-summary">{negative_summary}</div>
<h2>Overall</h2>
<div class="summary overall-summary">{overall_summary}</div>
<p><a href="/">Analyze another video</a></p>"#,
        link = encode_text(&report.link),
        form = link_form(&report.link),
        total = report.total,
        positive = pct.positive,
        negative = pct.negative,
        neutral = pct.neutral,
        positive_summary = multiline(&summary.positive),
        negative_summary = multiline(&summary.negative),
        overall_summary = multiline(&summary.overall),
    );
    page("Sentiment Dashboard", &body)
}

#[must_use]
pub fn error(message: &str) -> String {
    page(
        "Analysis failed",
        &format!(
            "<h1>Analysis failed</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
            encode_text(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ytsent_sentiment::PercentageBreakdown;
    use ytsent_summary::SummaryBundle;

    fn report() -> AnalysisReport {
        AnalysisReport {
            link: "https://youtu.be/abc?x=<b>".to_string(),
            video_id: Some("abc".to_string()),
            total: 3,
            positive_count: 1,
            negative_count: 1,
            neutral_count: 1,
            percentages: PercentageBreakdown {
                positive: 100.0 / 3.0,
                negative: 100.0 / 3.0,
                neutral: 100.0 / 3.0,
            },
            summary: SummaryBundle {
                positive: "Great audio.\nClear steps.".to_string(),
                negative: "<script>alert(1)</script>".to_string(),
                overall: "Mixed.".to_string(),
            },
        }
    }

    #[test]
    fn home_posts_youtube_link_to_dashboard() {
        let html = home();
        assert!(html.contains(r#"action="/dashboard""#));
        assert!(html.contains(r#"name="youtube_link""#));
    }

    #[test]
    fn dashboard_formats_percentages_to_one_decimal() {
        let html = dashboard(&report());
        assert!(html.contains("33.3%"));
        assert!(html.contains(r#"<div class="value">3</div>"#));
    }

    #[test]
    fn dashboard_renders_summary_lines_and_escapes() {
        let html = dashboard(&report());
        assert!(html.contains("Great audio.<br>\nClear steps."));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("https://youtu.be/abc?x=&lt;b&gt;"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = error("bad <input>");
        assert!(html.contains("bad &lt;input&gt;"));
    }
}
