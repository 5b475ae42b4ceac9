// Analytics handlers.
//
// GET /api/analytics — counts and percentages per sentiment
// GET /api/themes    — top themes, ?limit= (default 20, max 100)

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analytics::{self, DEFAULT_THEME_LIMIT};
use crate::web::{error_response, AppState};

const MAX_THEME_LIMIT: u32 = 100;

#[derive(Debug, Deserialize, Default)]
pub struct ThemesQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ThemeView {
    keyword: String,
    frequency: i64,
    sentiment: String,
}

pub async fn get_analytics(State(state): State<AppState>) -> Response {
    match analytics::overall(state.db.as_ref()).await {
        Ok(breakdown) => Json(breakdown).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn get_themes(
    State(state): State<AppState>,
    Query(params): Query<ThemesQuery>,
) -> Response {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_THEME_LIMIT)
        .clamp(1, MAX_THEME_LIMIT);

    match analytics::top_themes(state.db.as_ref(), limit).await {
        Ok(themes) => {
            let themes: Vec<ThemeView> = themes
                .into_iter()
                .map(|t| ThemeView {
                    keyword: t.keyword,
                    frequency: t.frequency,
                    sentiment: t.sentiment,
                })
                .collect();
            Json(serde_json::json!({ "themes": themes })).into_response()
        }
        Err(e) => error_response(&e),
    }
}
