//! Command handlers for the CLI.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context;
use ytsent_sentiment::{AnalysisReport, Analyzer, SentimentModel};

fn load_model(config: &ytsent_core::AppConfig) -> anyhow::Result<SentimentModel> {
    SentimentModel::load(&config.model_dir)
        .with_context(|| format!("loading model from {}", config.model_dir.display()))
}

pub(crate) async fn run_analyze(link: &str, json: bool) -> anyhow::Result<()> {
    let config = ytsent_core::load_app_config()?;
    let model = Arc::new(load_model(&config)?);
    let analyzer = Analyzer::from_config(&config, model)?;

    let report = analyzer.analyze(Some(link)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

pub(crate) fn run_classify(texts: &[String]) -> anyhow::Result<()> {
    let config = ytsent_core::load_app_config()?;
    let model = load_model(&config)?;
    for text in texts {
        println!("{}\t{text}", model.classify(text));
    }
    Ok(())
}

pub(crate) fn run_extract_id(url: &str) -> anyhow::Result<()> {
    let id = ytsent_youtube::extract_video_id(Some(url))
        .ok_or_else(|| anyhow::anyhow!("no video id found in '{url}'"))?;
    println!("{id}");
    Ok(())
}

pub(crate) fn format_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let pct = &report.percentages;
    let _ = writeln!(out, "Link:     {}", report.link);
    let _ = writeln!(
        out,
        "Video:    {}",
        report.video_id.as_deref().unwrap_or("(none)")
    );
    let _ = writeln!(out, "Comments: {}", report.total);
    let _ = writeln!(
        out,
        "Positive: {:.1}% ({})",
        pct.positive, report.positive_count
    );
    let _ = writeln!(
        out,
        "Negative: {:.1}% ({})",
        pct.negative, report.negative_count
    );
    let _ = writeln!(out, "Neutral:  {:.1}% ({})", pct.neutral, report.neutral_count);

    for (heading, text) in [
        ("Positive summary", &report.summary.positive),
        ("Negative summary", &report.summary.negative),
        ("Overall", &report.summary.overall),
    ] {
        if text.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{heading}:");
        for line in text.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}
