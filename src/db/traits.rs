// Database trait — backend-agnostic async interface for all DB operations.
//
// Implementors: SqliteDatabase (wraps rusqlite), PgDatabase (wraps sqlx).
// All methods are async so both the Mutex-guarded rusqlite connection and
// the native async sqlx pool fit behind one `Arc<dyn Database>`.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{FeedbackRecord, SentimentCounts, ThemeEntry};
use crate::analysis::analyzer::AnalysisResult;
use crate::sentiment::traits::Sentiment;

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Feedback ---

    /// Store one analyzed comment and merge its keywords into the themes
    /// table as a single atomic unit. Returns the new feedback id.
    async fn record_feedback(&self, text: &str, analysis: &AnalysisResult) -> Result<i64>;

    async fn get_feedback(&self, id: i64) -> Result<Option<FeedbackRecord>>;

    /// All feedback stored under a category label, oldest first.
    async fn feedback_by_category(&self, category: &str) -> Result<Vec<FeedbackRecord>>;

    /// Newest feedback first.
    async fn recent_feedback(&self, limit: u32) -> Result<Vec<FeedbackRecord>>;

    async fn count_feedback(&self) -> Result<i64>;

    /// Per-sentiment counts over all feedback, or one category's.
    async fn sentiment_counts(&self, category: Option<&str>) -> Result<SentimentCounts>;

    // --- Themes ---

    async fn get_theme(&self, keyword: &str, sentiment: Sentiment) -> Result<Option<ThemeEntry>>;

    /// Themes ordered by frequency descending, ties in insertion order.
    async fn top_themes(&self, limit: u32) -> Result<Vec<ThemeEntry>>;

    async fn count_themes(&self) -> Result<i64>;
}
