// PgDatabase — PostgreSQL backend implementing the Database trait.
//
// Uses sqlx PgPool for native async queries with runtime parameter binding,
// so no DATABASE_URL is needed at compile time.
//
// Differences from SQLite:
// - TIMESTAMPTZ instead of TEXT for timestamps (read back via to_char)
// - GENERATED ALWAYS AS IDENTITY for auto-increment
// - theme increments use INSERT ... ON CONFLICT DO UPDATE, which Postgres
//   applies atomically per row even under concurrent transactions

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx_core::pool::Pool;
use sqlx_core::row::Row;
use sqlx_postgres::{PgRow, Postgres};

use super::models::{FeedbackRecord, SentimentCounts, ThemeEntry};
use super::traits::Database;
use crate::aggregate::write_order;
use crate::analysis::analyzer::AnalysisResult;
use crate::sentiment::traits::Sentiment;

/// Type alias for the PostgreSQL connection pool.
pub type PgPool = Pool<Postgres>;

pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Connect to PostgreSQL and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run all pending migrations.
    ///
    /// Holds a session-level advisory lock on a dedicated connection for the
    /// whole sequence so two processes starting together don't race. The
    /// unlock runs even when a migration fails; the migration error wins.
    async fn run_migrations(&self) -> Result<()> {
        // ASCII "PULSEFB\0" as a big-endian i64.
        const MIGRATION_LOCK_KEY: i64 = 0x50554C5345464200_u64 as i64;

        let mut lock_conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection for migration advisory lock")?;

        sqlx_core::query::query("SELECT pg_advisory_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to acquire migration advisory lock")?;

        let migration_result: Result<()> = async {
            sqlx_core::query::query(
                "CREATE TABLE IF NOT EXISTS schema_version (
                    version INTEGER PRIMARY KEY,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
            )
            .execute(&self.pool)
            .await?;

            let migrations = [(
                1,
                include_str!("../../migrations/postgres/0001_initial.sql"),
            )];

            for (version, sql) in migrations {
                let applied: bool = sqlx_core::query::query(
                    "SELECT COUNT(*) > 0 FROM schema_version WHERE version = $1",
                )
                .bind(version)
                .fetch_one(&self.pool)
                .await
                .map(|row| row.get::<bool, _>(0))
                .unwrap_or(false);

                if !applied {
                    let mut tx = self.pool.begin().await?;
                    sqlx_core::raw_sql::raw_sql(sql).execute(&mut *tx).await?;
                    tx.commit().await?;
                }
            }

            Ok(())
        }
        .await;

        let unlock_result = sqlx_core::query::query("SELECT pg_advisory_unlock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to release migration advisory lock");

        migration_result?;
        unlock_result?;

        Ok(())
    }
}

const FEEDBACK_COLUMNS: &str = "id, text, sentiment, confidence_score, category,
    to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') as created_at";

const THEME_COLUMNS: &str = "id, keyword, sentiment, frequency,
    to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') as created_at";

fn feedback_from_row(row: &PgRow) -> FeedbackRecord {
    FeedbackRecord {
        id: row.get(0),
        text: row.get(1),
        sentiment: row.get(2),
        confidence_score: row.get(3),
        category: row.get(4),
        created_at: row.get(5),
    }
}

fn theme_from_row(row: &PgRow) -> ThemeEntry {
    ThemeEntry {
        id: row.get(0),
        keyword: row.get(1),
        sentiment: row.get(2),
        frequency: row.get(3),
        created_at: row.get(4),
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn table_count(&self) -> Result<i64> {
        let row = sqlx_core::query::query(
            "SELECT COUNT(*)::bigint FROM information_schema.tables
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>(0))
    }

    async fn record_feedback(&self, text: &str, analysis: &AnalysisResult) -> Result<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin feedback transaction")?;

        let row = sqlx_core::query::query(
            "INSERT INTO feedback (text, sentiment, confidence_score, category)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(text)
        .bind(analysis.sentiment.as_str())
        .bind(analysis.confidence)
        .bind(analysis.category.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let id = row.get::<i64, _>(0);

        for kw in write_order(&analysis.keywords) {
            sqlx_core::query::query(
                "INSERT INTO themes (keyword, sentiment, frequency)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (keyword, sentiment)
                 DO UPDATE SET frequency = themes.frequency + EXCLUDED.frequency",
            )
            .bind(&kw.keyword)
            .bind(analysis.sentiment.as_str())
            .bind(i64::from(kw.frequency))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .context("Failed to commit feedback transaction")?;
        Ok(id)
    }

    async fn get_feedback(&self, id: i64) -> Result<Option<FeedbackRecord>> {
        let row = sqlx_core::query::query(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(feedback_from_row))
    }

    async fn feedback_by_category(&self, category: &str) -> Result<Vec<FeedbackRecord>> {
        let rows = sqlx_core::query::query(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE category = $1 ORDER BY id ASC"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(feedback_from_row).collect())
    }

    async fn recent_feedback(&self, limit: u32) -> Result<Vec<FeedbackRecord>> {
        let rows = sqlx_core::query::query(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback ORDER BY id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(feedback_from_row).collect())
    }

    async fn count_feedback(&self) -> Result<i64> {
        let row = sqlx_core::query::query("SELECT COUNT(*)::bigint FROM feedback")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>(0))
    }

    async fn sentiment_counts(&self, category: Option<&str>) -> Result<SentimentCounts> {
        let rows = sqlx_core::query::query(
            "SELECT sentiment, COUNT(*)::bigint FROM feedback
             WHERE $1::text IS NULL OR category = $1
             GROUP BY sentiment",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = SentimentCounts::default();
        for row in &rows {
            counts.add(&row.get::<String, _>(0), row.get::<i64, _>(1));
        }
        Ok(counts)
    }

    async fn get_theme(&self, keyword: &str, sentiment: Sentiment) -> Result<Option<ThemeEntry>> {
        let row = sqlx_core::query::query(&format!(
            "SELECT {THEME_COLUMNS} FROM themes WHERE keyword = $1 AND sentiment = $2"
        ))
        .bind(keyword)
        .bind(sentiment.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(theme_from_row))
    }

    async fn top_themes(&self, limit: u32) -> Result<Vec<ThemeEntry>> {
        let rows = sqlx_core::query::query(&format!(
            "SELECT {THEME_COLUMNS} FROM themes ORDER BY frequency DESC, id ASC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(theme_from_row).collect())
    }

    async fn count_themes(&self) -> Result<i64> {
        let row = sqlx_core::query::query("SELECT COUNT(*)::bigint FROM themes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>(0))
    }
}
