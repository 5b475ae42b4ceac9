// Database schema — table creation and migrations.
//
// A `schema_version` table records which migrations have run; each later
// migration is a closure executed at most once.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet. Safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per submitted comment
        CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            sentiment TEXT NOT NULL,           -- positive / negative / neutral
            confidence_score REAL NOT NULL,    -- 0.0 to 1.0
            category TEXT NOT NULL,            -- course / faculty / facilities / events / general
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Running keyword frequencies, one row per (keyword, sentiment)
        CREATE TABLE IF NOT EXISTS themes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT NOT NULL,
            sentiment TEXT NOT NULL,
            frequency INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (keyword, sentiment)
        );
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: indexes for the per-category breakdown and theme ranking.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_feedback_category ON feedback(category);
             CREATE INDEX IF NOT EXISTS idx_themes_frequency ON themes(frequency DESC);",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the user tables in the database (shown after `pulse init`).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: Vec<i64> = conn
            .prepare("SELECT version FROM schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(versions, vec![1, 2]);
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, feedback, themes
        assert_eq!(table_count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_themes_unique_per_keyword_and_sentiment() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO themes (keyword, sentiment, frequency) VALUES ('exam', 'positive', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO themes (keyword, sentiment, frequency) VALUES ('exam', 'negative', 1)",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO themes (keyword, sentiment, frequency) VALUES ('exam', 'positive', 2)",
            [],
        );
        assert!(dup.is_err());
    }
}
