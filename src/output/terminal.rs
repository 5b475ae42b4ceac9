// Colored terminal output for analyses, breakdowns, and theme tables.
//
// main.rs delegates all CLI display here.

use colored::{ColoredString, Colorize};

use super::truncate_chars;
use crate::analytics::{CategoryBreakdown, SentimentBreakdown};
use crate::db::models::{FeedbackRecord, ThemeEntry};
use crate::pipeline::bulk::BulkReport;
use crate::pipeline::submit::SubmittedFeedback;
use crate::sentiment::traits::ClassifierPath;

fn colorize_sentiment(label: &str) -> ColoredString {
    match label {
        "positive" => label.green(),
        "negative" => label.red(),
        _ => label.yellow(),
    }
}

/// Show one stored submission.
pub fn display_submission(stored: &SubmittedFeedback) {
    println!("\n{}", format!("=== Feedback #{} ===", stored.id).bold());
    println!("  Text:       {}", truncate_chars(&stored.text, 100));
    println!(
        "  Sentiment:  {} ({:.2})",
        colorize_sentiment(stored.sentiment.as_str()),
        stored.confidence_score
    );
    println!("  Category:   {}", stored.category);

    let source = match stored.analysis.classifier {
        ClassifierPath::Primary => "completion service",
        ClassifierPath::Fallback => "local lexicon",
    };
    println!("  Classifier: {}", source.dimmed());

    if !stored.analysis.keywords.is_empty() {
        let keywords: Vec<String> = stored
            .analysis
            .keywords
            .iter()
            .map(|k| {
                if k.frequency > 1 {
                    format!("{} x{}", k.keyword, k.frequency)
                } else {
                    k.keyword.clone()
                }
            })
            .collect();
        println!("  Keywords:   {}", keywords.join(", "));
    }
}

fn print_breakdown_rows(b: &SentimentBreakdown) {
    let rows = [
        ("positive", b.positive_count, b.positive_percentage),
        ("negative", b.negative_count, b.negative_percentage),
        ("neutral", b.neutral_count, b.neutral_percentage),
    ];
    for (label, count, pct) in rows {
        // 1 block per 2.5%
        let bar = "#".repeat((pct / 2.5).round() as usize);
        println!(
            "  {:<9} {:>6}  {:>6.2}%  {}",
            colorize_sentiment(label),
            count,
            pct,
            bar.dimmed()
        );
    }
}

/// Show overall sentiment analytics.
pub fn display_breakdown(b: &SentimentBreakdown) {
    if b.total_feedback == 0 {
        println!("No feedback stored yet. Run `pulse submit` or `pulse ingest` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Sentiment Analytics ({} entries) ===", b.total_feedback).bold()
    );
    println!();
    print_breakdown_rows(b);
}

/// Show one category's sentiment breakdown and its most recent entries.
pub fn display_category(c: &CategoryBreakdown, entries: &[FeedbackRecord]) {
    println!(
        "\n{}",
        format!(
            "=== Category: {} ({} entries) ===",
            c.category, c.breakdown.total_feedback
        )
        .bold()
    );
    println!();
    print_breakdown_rows(&c.breakdown);

    if !entries.is_empty() {
        println!("\n  {}", "Latest:".dimmed());
        for entry in entries.iter().rev().take(5) {
            println!(
                "    [{}] {}",
                colorize_sentiment(&entry.sentiment),
                truncate_chars(&entry.text, 80)
            );
        }
    }
}

/// Show the theme table.
pub fn display_themes(themes: &[ThemeEntry]) {
    if themes.is_empty() {
        println!("No themes recorded yet.");
        return;
    }

    println!("\n{}", format!("=== Top {} Themes ===", themes.len()).bold());
    println!();
    println!(
        "  {:>4}  {:<24} {:<10} {:>9}",
        "Rank".dimmed(),
        "Keyword".dimmed(),
        "Sentiment".dimmed(),
        "Frequency".dimmed(),
    );
    println!("  {}", "-".repeat(52).dimmed());

    for (i, theme) in themes.iter().enumerate() {
        println!(
            "  {:>4}. {:<24} {:<10} {:>9}",
            i + 1,
            truncate_chars(&theme.keyword, 24),
            colorize_sentiment(&theme.sentiment),
            theme.frequency,
        );
    }
}

/// Summarize a bulk ingestion run.
pub fn display_bulk_report(report: &BulkReport) {
    println!("\n{}", report.message().green().bold());
    if report.skipped > 0 {
        println!("  {} {} rows skipped", "~".yellow(), report.skipped);
    }

    let mut counts = [0usize; 3];
    for r in &report.results {
        let idx = match r.sentiment.as_str() {
            "positive" => 0,
            "negative" => 1,
            _ => 2,
        };
        counts[idx] += 1;
    }
    println!(
        "  {} positive, {} negative, {} neutral",
        counts[0].to_string().green(),
        counts[1].to_string().red(),
        counts[2].to_string().yellow(),
    );
}
