// Feedback handlers.
//
// POST /api/feedback                      — {text, category?} -> stored feedback
// POST /api/feedback/bulk                 — multipart upload, field `file`
// GET  /api/feedback/category/{category}  — breakdown, or a "none found" message

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::analysis::analyzer::Comment;
use crate::analytics;
use crate::error::InputError;
use crate::ingest;
use crate::pipeline::{bulk, submit};
use crate::web::{api_error, error_response, AppState};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(body): Json<FeedbackRequest>,
) -> Response {
    let comment = match Comment::new(body.text, body.category) {
        Ok(c) => c,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    match submit::submit(&state.analyzer, state.db.as_ref(), &comment).await {
        Ok(stored) => Json(stored).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Pull the `file` field out of a multipart body as (filename, bytes).
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), InputError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| InputError::Malformed(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| InputError::Malformed(e.body_text()))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(InputError::MissingFile)
}

pub async fn upload_bulk(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok((filename, bytes)) => ingest::parse_upload(&filename, &bytes),
        Err(e) => Err(e),
    };
    let upload = match upload {
        Ok(u) => u,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let report = match bulk::ingest(
        &state.analyzer,
        state.db.as_ref(),
        upload,
        state.config.bulk_concurrency,
        false,
    )
    .await
    {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };

    Json(serde_json::json!({
        "message": report.message(),
        "results": report.results,
        "skipped": report.skipped,
    }))
    .into_response()
}

pub async fn feedback_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Response {
    match analytics::for_category(state.db.as_ref(), &category).await {
        Ok(Some(breakdown)) => Json(breakdown).into_response(),
        Ok(None) => Json(serde_json::json!({
            "message": analytics::no_feedback_message(&category),
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}
