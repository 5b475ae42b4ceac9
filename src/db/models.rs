// Data models — Rust structs that map to database rows.
//
// Kept free of rusqlite and sqlx types so the analysis and web layers can
// use them whichever backend is compiled in.

use serde::{Deserialize, Serialize};

use crate::sentiment::traits::Sentiment;

/// One stored piece of feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub text: String,
    pub sentiment: String,
    pub confidence_score: f64,
    pub category: String,
    pub created_at: String,
}

/// A (keyword, sentiment) pair with its running frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub id: i64,
    pub keyword: String,
    pub sentiment: String,
    pub frequency: i64,
    pub created_at: String,
}

/// Feedback counts per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
}

impl SentimentCounts {
    pub fn total(&self) -> i64 {
        self.positive + self.negative + self.neutral
    }

    /// Add `count` rows under a stored label. Labels outside the three
    /// sentiments are ignored.
    pub fn add(&mut self, label: &str, count: i64) {
        match label.parse::<Sentiment>() {
            Ok(Sentiment::Positive) => self.positive += count,
            Ok(Sentiment::Negative) => self.negative += count,
            Ok(Sentiment::Neutral) => self.neutral += count,
            Err(_) => {}
        }
    }
}
