// Pulse: sentiment, category, and theme analysis for student feedback.
//
// `analysis` and `sentiment` turn one comment into an AnalysisResult, `db`
// persists it, and `pipeline` ties the two together. Everything else reads
// back what has been stored.

pub mod aggregate;
pub mod analysis;
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod sentiment;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
