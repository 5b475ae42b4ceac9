// Bulk ingestion pipeline: upload rows -> analysis -> per-row commit.
//
// 1. Analyze rows concurrently (classification is network-bound when the
//    completion service is configured); `buffered` keeps row order.
// 2. Store each analyzed row in its own transaction, in order. A row that
//    fails to store is logged and skipped; rows already committed stay.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::analyzer::{Analyzer, Comment};
use crate::analysis::category::Category;
use crate::db::Database;
use crate::ingest::Upload;
use crate::sentiment::traits::Sentiment;

/// One stored row as reported back to the uploader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResult {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkReport {
    pub results: Vec<BulkResult>,
    /// Rows with blank text plus rows that failed to store.
    pub skipped: usize,
}

impl BulkReport {
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    pub fn message(&self) -> String {
        format!("Successfully processed {} feedback entries", self.processed())
    }
}

/// Analyze and store every row of an upload.
pub async fn ingest(
    analyzer: &Analyzer,
    db: &dyn Database,
    upload: Upload,
    concurrency: usize,
    show_progress: bool,
) -> Result<BulkReport> {
    let mut report = BulkReport {
        results: Vec::with_capacity(upload.rows.len()),
        skipped: upload.empty_rows,
    };

    if upload.rows.is_empty() {
        info!(skipped = report.skipped, "Upload contained no usable rows");
        return Ok(report);
    }

    let pb = if show_progress {
        let pb = ProgressBar::new(upload.rows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Analyzing [{bar:30}] {pos}/{len} ({eta})")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    // Phase 1: analyze, at most `concurrency` rows in flight
    let analyzed: Vec<_> = stream::iter(upload.rows.into_iter().map(|row| {
        let pb = &pb;
        async move {
            let comment = Comment::new(row.text, row.category);
            let outcome = match comment {
                Ok(comment) => {
                    let analysis = analyzer.analyze(&comment).await;
                    Ok((comment, analysis))
                }
                Err(e) => Err(e),
            };
            pb.inc(1);
            (row.row, outcome)
        }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    pb.finish_and_clear();

    // Phase 2: commit row by row
    for (row, outcome) in analyzed {
        let (comment, analysis) = match outcome {
            Ok(pair) => pair,
            Err(e) => {
                warn!(row, error = %e, "Skipping unusable row");
                report.skipped += 1;
                continue;
            }
        };

        match db.record_feedback(&comment.text, &analysis).await {
            Ok(_) => report.results.push(BulkResult {
                text: comment.text,
                sentiment: analysis.sentiment,
                confidence: analysis.confidence,
                category: analysis.category,
            }),
            Err(e) => {
                warn!(row, error = %format!("{e:#}"), "Failed to store row, skipping");
                report.skipped += 1;
            }
        }
    }

    info!(
        processed = report.processed(),
        skipped = report.skipped,
        "Bulk ingestion complete"
    );
    Ok(report)
}
