use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::db::queries::categories;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::{ListQuery, auth};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryPayload {
    pub title: String,
}

/// GET /categories — paginated listing.
pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let (offset, limit) = query.window();
    let page = categories::read_all(&state.db, offset, limit).await?;
    Ok(Json(page).into_response())
}

/// POST /categories — create a category.
pub async fn post_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CategoryPayload>,
) -> Result<Response, AppError> {
    auth::require_user(&state, &headers).await?;

    let outcome = categories::create(&state.db, &payload.title).await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok((StatusCode::CREATED, Json(outcome.data)).into_response())
}
