// Analytics — sentiment breakdowns over stored feedback.
//
// Percentages are count / total * 100, rounded to two decimal places.
// An empty population reports zero everywhere rather than dividing by zero.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::db::models::{SentimentCounts, ThemeEntry};
use crate::db::Database;

/// Default number of themes returned by `themes`.
pub const DEFAULT_THEME_LIMIT: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub total_feedback: i64,
    pub positive_count: i64,
    pub negative_count: i64,
    pub neutral_count: i64,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
}

impl SentimentBreakdown {
    pub fn from_counts(counts: SentimentCounts) -> Self {
        let total = counts.total();
        Self {
            total_feedback: total,
            positive_count: counts.positive,
            negative_count: counts.negative,
            neutral_count: counts.neutral,
            positive_percentage: percentage(counts.positive, total),
            negative_percentage: percentage(counts.negative, total),
            neutral_percentage: percentage(counts.neutral, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    #[serde(flatten)]
    pub breakdown: SentimentBreakdown,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

/// Breakdown over all stored feedback.
pub async fn overall(db: &dyn Database) -> Result<SentimentBreakdown> {
    let counts = db.sentiment_counts(None).await?;
    Ok(SentimentBreakdown::from_counts(counts))
}

/// Breakdown for one category, or `None` when it has no feedback.
///
/// The name is matched against stored labels after trimming and lowercasing.
pub async fn for_category(db: &dyn Database, name: &str) -> Result<Option<CategoryBreakdown>> {
    let category = name.trim().to_lowercase();
    let counts = db.sentiment_counts(Some(&category)).await?;
    if counts.total() == 0 {
        return Ok(None);
    }
    Ok(Some(CategoryBreakdown {
        category,
        breakdown: SentimentBreakdown::from_counts(counts),
    }))
}

/// The message returned when a category has no feedback.
pub fn no_feedback_message(name: &str) -> String {
    format!("No feedback found for category: {name}")
}

/// The most frequent themes.
pub async fn top_themes(db: &dyn Database, limit: u32) -> Result<Vec<ThemeEntry>> {
    db.top_themes(limit).await
}
