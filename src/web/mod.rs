// Web server — Axum JSON API over the feedback pipeline.
//
// Routes:
//   GET  /                                  service banner
//   GET  /health                            liveness
//   POST /api/feedback                      analyze + store one comment
//   POST /api/feedback/bulk                 multipart upload (field `file`)
//   GET  /api/feedback/category/{category}  per-category breakdown
//   GET  /api/analytics                     overall sentiment breakdown
//   GET  /api/themes                        top themes (?limit=, default 20)
//
// Input errors become 400 with their message. Anything else is logged and
// answered with a generic 500.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::analysis::analyzer::Analyzer;
use crate::config::Config;
use crate::db::Database;
use crate::error::as_input_error;

pub mod handlers;

/// Largest accepted request body (bulk uploads).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const BANNER: &str = "Student Feedback Sentiment Analysis API";

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub analyzer: Arc<Analyzer>,
    pub config: Arc<Config>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, db: Arc<dyn Database>, analyzer: Arc<Analyzer>) -> Result<()> {
    let addr = config.bind.clone();
    let state = AppState {
        db,
        analyzer,
        config: Arc::new(config),
    };

    let app = build_router(state);

    info!("Pulse API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origin: &str) -> CorsLayer {
    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]),
        Err(_) => {
            warn!(origin, "PULSE_CORS_ORIGIN is not a valid header value, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/feedback", post(handlers::feedback::submit_feedback))
        .route("/api/feedback/bulk", post(handlers::feedback::upload_bulk))
        .route(
            "/api/feedback/category/{category}",
            get(handlers::feedback::feedback_by_category),
        )
        .route("/api/analytics", get(handlers::analytics::get_analytics))
        .route("/api/themes", get(handlers::analytics::get_themes));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": BANNER }))
}

/// Health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// JSON error response: `{"detail": message}`.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": message }))).into_response()
}

/// Map a pipeline error to a response: input errors are the caller's fault
/// (400, message passed through); everything else is ours (500, logged).
pub fn error_response(err: &anyhow::Error) -> Response {
    match as_input_error(err) {
        Some(input) => api_error(StatusCode::BAD_REQUEST, &input.to_string()),
        None => {
            error!(error = %format!("{err:#}"), "Request failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred. Check server logs.",
            )
        }
    }
}
