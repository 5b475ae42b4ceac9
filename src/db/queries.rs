// Database queries — CRUD operations for the feedback and themes tables.
//
// All SQLite SQL lives here. SqliteDatabase wraps these functions behind the
// async Database trait; tests call them directly against an in-memory
// connection.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::models::{FeedbackRecord, SentimentCounts, ThemeEntry};
use crate::aggregate::{merge_keywords, ThemeLedger};
use crate::analysis::analyzer::AnalysisResult;
use crate::sentiment::traits::Sentiment;

// --- Feedback ---

/// Store one analyzed comment and fold its keywords into the themes table,
/// all in a single IMMEDIATE transaction. Returns the new feedback id.
///
/// Either both the row and every theme increment land, or neither does.
pub fn record_feedback(conn: &mut Connection, text: &str, analysis: &AnalysisResult) -> Result<i64> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to begin feedback transaction")?;

    let id = insert_feedback(
        &tx,
        text,
        analysis.sentiment.as_str(),
        analysis.confidence,
        analysis.category.as_str(),
    )?;
    merge_keywords(&*tx, analysis.sentiment, &analysis.keywords)?;

    tx.commit().context("Failed to commit feedback transaction")?;
    Ok(id)
}

/// Insert a feedback row and return its id.
pub fn insert_feedback(
    conn: &Connection,
    text: &str,
    sentiment: &str,
    confidence_score: f64,
    category: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO feedback (text, sentiment, confidence_score, category)
         VALUES (?1, ?2, ?3, ?4)",
        params![text, sentiment, confidence_score, category],
    )?;
    Ok(conn.last_insert_rowid())
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    Ok(FeedbackRecord {
        id: row.get(0)?,
        text: row.get(1)?,
        sentiment: row.get(2)?,
        confidence_score: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn get_feedback(conn: &Connection, id: i64) -> Result<Option<FeedbackRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, sentiment, confidence_score, category, created_at
         FROM feedback WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id], feedback_from_row).optional()?;
    Ok(result)
}

/// All feedback in a category, oldest first.
pub fn feedback_by_category(conn: &Connection, category: &str) -> Result<Vec<FeedbackRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, sentiment, confidence_score, category, created_at
         FROM feedback WHERE category = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![category], feedback_from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Most recent feedback, newest first.
pub fn recent_feedback(conn: &Connection, limit: u32) -> Result<Vec<FeedbackRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, sentiment, confidence_score, category, created_at
         FROM feedback ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], feedback_from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

pub fn count_feedback(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
    Ok(count)
}

/// Per-sentiment counts, optionally restricted to one category.
pub fn sentiment_counts(conn: &Connection, category: Option<&str>) -> Result<SentimentCounts> {
    let mut counts = SentimentCounts::default();
    let mut stmt = conn.prepare(
        "SELECT sentiment, COUNT(*) FROM feedback
         WHERE ?1 IS NULL OR category = ?1
         GROUP BY sentiment",
    )?;
    let rows = stmt.query_map(params![category], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (label, count) = row?;
        counts.add(&label, count);
    }
    Ok(counts)
}

// --- Themes ---

fn theme_from_row(row: &Row<'_>) -> rusqlite::Result<ThemeEntry> {
    Ok(ThemeEntry {
        id: row.get(0)?,
        keyword: row.get(1)?,
        sentiment: row.get(2)?,
        frequency: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn get_theme(conn: &Connection, keyword: &str, sentiment: &str) -> Result<Option<ThemeEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, keyword, sentiment, frequency, created_at
         FROM themes WHERE keyword = ?1 AND sentiment = ?2",
    )?;
    let result = stmt
        .query_row(params![keyword, sentiment], theme_from_row)
        .optional()?;
    Ok(result)
}

pub fn insert_theme(conn: &Connection, keyword: &str, sentiment: &str, frequency: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO themes (keyword, sentiment, frequency) VALUES (?1, ?2, ?3)",
        params![keyword, sentiment, frequency],
    )?;
    Ok(())
}

/// Add `amount` to a theme's frequency. Relative update, never a write-back.
pub fn increment_theme(conn: &Connection, id: i64, amount: i64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE themes SET frequency = frequency + ?1 WHERE id = ?2",
        params![amount, id],
    )?;
    if changed == 0 {
        anyhow::bail!("No theme with id {id}");
    }
    Ok(())
}

/// Highest-frequency themes; ties keep insertion order.
pub fn top_themes(conn: &Connection, limit: u32) -> Result<Vec<ThemeEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, keyword, sentiment, frequency, created_at
         FROM themes ORDER BY frequency DESC, id ASC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], theme_from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

pub fn count_themes(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM themes", [], |row| row.get(0))?;
    Ok(count)
}

impl ThemeLedger for Connection {
    fn get_theme(&self, keyword: &str, sentiment: Sentiment) -> Result<Option<ThemeEntry>> {
        get_theme(self, keyword, sentiment.as_str())
    }

    fn insert_theme(&self, keyword: &str, sentiment: Sentiment, frequency: i64) -> Result<()> {
        insert_theme(self, keyword, sentiment.as_str(), frequency)
    }

    fn increment_theme(&self, id: i64, amount: i64) -> Result<()> {
        increment_theme(self, id, amount)
    }
}
