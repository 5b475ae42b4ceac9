// Single-comment submission.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::analysis::analyzer::{AnalysisResult, Analyzer, Comment};
use crate::analysis::category::Category;
use crate::db::Database;
use crate::sentiment::traits::Sentiment;

/// What a caller gets back after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedFeedback {
    pub id: i64,
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence_score: f64,
    pub category: Category,
    #[serde(skip)]
    pub analysis: AnalysisResult,
}

/// Analyze a comment and store it, together with its theme increments, as
/// one atomic unit. On error nothing is stored.
pub async fn submit(analyzer: &Analyzer, db: &dyn Database, comment: &Comment) -> Result<SubmittedFeedback> {
    let analysis = analyzer.analyze(comment).await;
    let id = db.record_feedback(&comment.text, &analysis).await?;

    info!(
        id,
        sentiment = %analysis.sentiment,
        category = %analysis.category,
        keywords = analysis.keywords.len(),
        "Stored feedback"
    );

    Ok(SubmittedFeedback {
        id,
        text: comment.text.clone(),
        sentiment: analysis.sentiment,
        confidence_score: analysis.confidence,
        category: analysis.category,
        analysis,
    })
}
