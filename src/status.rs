// System status display — storage backend, row counts, classifier setup.

use anyhow::Result;
use std::path::Path;

use crate::config::{ClassifierMode, Config};
use crate::db::Database;
use crate::output::truncate_chars;

/// Where feedback is stored, as shown to the user.
pub fn backend_label(config: &Config) -> String {
    match config.database_url.as_deref() {
        Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            "PostgreSQL (DATABASE_URL)".to_string()
        }
        _ => {
            let size = std::fs::metadata(&config.db_path)
                .map(|m| format_bytes(m.len()))
                .unwrap_or_else(|_| "unknown".to_string());
            format!("SQLite {} ({})", config.db_path, size)
        }
    }
}

/// Whether there is any database to report on.
pub fn is_initialized(config: &Config) -> bool {
    config.database_url.is_some() || Path::new(&config.db_path).exists()
}

pub fn classifier_label(config: &Config) -> String {
    match (config.classifier_mode, config.use_completion_service()) {
        (ClassifierMode::Lexicon, _) => "local lexicon only (PULSE_CLASSIFIER=lexicon)".to_string(),
        (_, true) => format!(
            "{} via {} (lexicon fallback, {}s timeout)",
            config.llm_model,
            config.llm_url,
            config.llm_timeout.as_secs()
        ),
        (_, false) => "local lexicon (OPENAI_API_KEY not set)".to_string(),
    }
}

/// Display system status to the terminal.
pub async fn show(db: &dyn Database, config: &Config) -> Result<()> {
    println!("Database: {}", backend_label(config));
    println!("Classifier: {}", classifier_label(config));

    let feedback = db.count_feedback().await?;
    let themes = db.count_themes().await?;
    println!("Feedback entries: {}", feedback);
    println!("Distinct themes: {}", themes);

    let recent = db.recent_feedback(5).await?;
    if recent.is_empty() {
        println!("Recent feedback: none yet");
        println!("  Run `pulse submit \"...\"` or `pulse ingest <file>` to add some");
    } else {
        println!("Recent feedback:");
        for entry in &recent {
            println!(
                "  #{} [{} / {}] {} ({})",
                entry.id,
                entry.sentiment,
                entry.category,
                truncate_chars(&entry.text, 60),
                entry.created_at
            );
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_labels() {
        let mut config = Config {
            database_url: Some("postgres://localhost/pulse".to_string()),
            ..Config::default()
        };
        assert_eq!(backend_label(&config), "PostgreSQL (DATABASE_URL)");
        assert!(is_initialized(&config));

        config.openai_api_key = "sk-test".to_string();
        assert!(classifier_label(&config).starts_with("gpt-3.5-turbo"));
        config.classifier_mode = ClassifierMode::Lexicon;
        assert!(classifier_label(&config).contains("lexicon only"));
    }
}
