// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Send.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// Only one submission holds the connection at a time, and each submission's
// writes run in an IMMEDIATE transaction, so theme increments from
// concurrent requests are serialized and none is lost.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{FeedbackRecord, SentimentCounts, ThemeEntry};
use super::traits::Database;
use crate::analysis::analyzer::AnalysisResult;
use crate::sentiment::traits::Sentiment;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn record_feedback(&self, text: &str, analysis: &AnalysisResult) -> Result<i64> {
        let mut conn = self.conn.lock().await;
        super::queries::record_feedback(&mut conn, text, analysis)
    }

    async fn get_feedback(&self, id: i64) -> Result<Option<FeedbackRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_feedback(&conn, id)
    }

    async fn feedback_by_category(&self, category: &str) -> Result<Vec<FeedbackRecord>> {
        let conn = self.conn.lock().await;
        super::queries::feedback_by_category(&conn, category)
    }

    async fn recent_feedback(&self, limit: u32) -> Result<Vec<FeedbackRecord>> {
        let conn = self.conn.lock().await;
        super::queries::recent_feedback(&conn, limit)
    }

    async fn count_feedback(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_feedback(&conn)
    }

    async fn sentiment_counts(&self, category: Option<&str>) -> Result<SentimentCounts> {
        let conn = self.conn.lock().await;
        super::queries::sentiment_counts(&conn, category)
    }

    async fn get_theme(&self, keyword: &str, sentiment: Sentiment) -> Result<Option<ThemeEntry>> {
        let conn = self.conn.lock().await;
        super::queries::get_theme(&conn, keyword, sentiment.as_str())
    }

    async fn top_themes(&self, limit: u32) -> Result<Vec<ThemeEntry>> {
        let conn = self.conn.lock().await;
        super::queries::top_themes(&conn, limit)
    }

    async fn count_themes(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_themes(&conn)
    }
}
