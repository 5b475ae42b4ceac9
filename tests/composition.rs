// Composition tests — comments flowing through analysis into storage and
// back out through analytics.
//
// Everything runs offline: the analyzer uses the local lexicon and the
// database is in-memory SQLite.

#![cfg(feature = "sqlite")]

use std::sync::Arc;

use pulse::analysis::analyzer::{Analyzer, Comment};
use pulse::analysis::category::Category;
use pulse::analytics;
use pulse::db::open_in_memory;
use pulse::ingest::parse_upload;
use pulse::pipeline::{bulk, submit};
use pulse::sentiment::traits::Sentiment;

async fn store(analyzer: &Analyzer, db: &dyn pulse::db::Database, text: &str, hint: Option<&str>) {
    let comment = Comment::new(text, hint.map(str::to_string)).unwrap();
    submit::submit(analyzer, db, &comment).await.unwrap();
}

// ============================================================
// Chain: Comment -> Analyzer -> Database -> Analytics
// ============================================================

#[tokio::test]
async fn analytics_percentages_follow_stored_sentiments() {
    let db = open_in_memory().unwrap();
    let analyzer = Analyzer::offline();

    for text in [
        "The course was great",
        "Excellent professor",
        "Wonderful workshop",
        "Really helpful lab staff",
        "I love the library",
        "Good syllabus",
    ] {
        store(&analyzer, db.as_ref(), text, None).await;
    }
    for text in ["Terrible wifi", "The exam was awful", "Boring seminar"] {
        store(&analyzer, db.as_ref(), text, None).await;
    }
    store(&analyzer, db.as_ref(), "The seminar is on Tuesday", None).await;

    let b = analytics::overall(db.as_ref()).await.unwrap();
    assert_eq!(b.total_feedback, 10);
    assert_eq!(b.positive_count, 6);
    assert_eq!(b.negative_count, 3);
    assert_eq!(b.neutral_count, 1);
    assert_eq!(b.positive_percentage, 60.0);
    assert_eq!(b.negative_percentage, 30.0);
    assert_eq!(b.neutral_percentage, 10.0);
}

#[tokio::test]
async fn empty_database_reports_zeroes() {
    let db = open_in_memory().unwrap();
    let b = analytics::overall(db.as_ref()).await.unwrap();
    assert_eq!(b.total_feedback, 0);
    assert_eq!(b.positive_percentage, 0.0);
    assert!(analytics::top_themes(db.as_ref(), 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn repeated_keywords_accumulate_per_sentiment() {
    let db = open_in_memory().unwrap();
    let analyzer = Analyzer::offline();

    store(&analyzer, db.as_ref(), "Great library, great library staff", None).await;
    store(&analyzer, db.as_ref(), "The library is wonderful", None).await;
    store(&analyzer, db.as_ref(), "The library is dirty", None).await;

    let positive = db
        .get_theme("library", Sentiment::Positive)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(positive.frequency, 3);

    let negative = db
        .get_theme("library", Sentiment::Negative)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(negative.frequency, 1);

    let themes = analytics::top_themes(db.as_ref(), 20).await.unwrap();
    assert_eq!(themes[0].keyword, "library");
    assert_eq!(themes[0].sentiment, "positive");
    assert!(themes.len() <= 20);
}

#[tokio::test]
async fn category_breakdown_uses_resolved_category() {
    let db = open_in_memory().unwrap();
    let analyzer = Analyzer::offline();

    store(&analyzer, db.as_ref(), "Great professor", None).await;
    store(&analyzer, db.as_ref(), "Boring lecture", Some("faculty")).await;
    store(&analyzer, db.as_ref(), "Fun fest", Some("events")).await;

    let faculty = analytics::for_category(db.as_ref(), "Faculty")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(faculty.category, "faculty");
    assert_eq!(faculty.breakdown.total_feedback, 2);
    assert_eq!(faculty.breakdown.positive_percentage, 50.0);
    assert_eq!(faculty.breakdown.negative_percentage, 50.0);

    assert!(analytics::for_category(db.as_ref(), "facilities")
        .await
        .unwrap()
        .is_none());
}

// ============================================================
// Chain: Upload bytes -> Rows -> Bulk pipeline -> Database
// ============================================================

#[tokio::test]
async fn csv_upload_commits_each_usable_row() {
    let db = open_in_memory().unwrap();
    let analyzer = Arc::new(Analyzer::offline());

    let csv = "Text,Category\n\
               The lab equipment is outdated,\n\
               ,events\n\
               Annual cultural event was fun,general\n\
               The assignment deadlines are unfair,course\n";
    let upload = parse_upload("feedback.csv", csv.as_bytes()).unwrap();
    assert_eq!(upload.rows.len(), 3);
    assert_eq!(upload.empty_rows, 1);

    let report = bulk::ingest(&analyzer, db.as_ref(), upload, 2, false)
        .await
        .unwrap();
    assert_eq!(report.processed(), 3);
    assert_eq!(report.skipped, 1);

    let categories: Vec<Category> = report.results.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![Category::Facilities, Category::Events, Category::Course]
    );
    assert_eq!(db.count_feedback().await.unwrap(), 3);

    let outdated = db
        .get_theme("outdated", Sentiment::Negative)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outdated.frequency, 1);
}
