use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::queries::books;
use crate::db::queries::books::BookInput;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::{ListQuery, auth};

/// GET /books — paginated listing, optionally filtered by a title search.
pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let (offset, limit) = query.window();
    let page = books::find_all(&state.db, query.search.as_deref(), offset, limit).await?;
    Ok(Json(page).into_response())
}

/// POST /books — create a book.
pub async fn post_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<BookInput>,
) -> Result<Response, AppError> {
    auth::require_user(&state, &headers).await?;

    let outcome = books::add_one(&state.db, &input).await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok((StatusCode::CREATED, Json(outcome.data)).into_response())
}

/// GET /books/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let book = books::read_one(&state.db, id).await?;
    Ok(Json(book).into_response())
}

/// PATCH /books/{id} — validated update; unchanged title/ISBN stay valid.
pub async fn patch_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<BookInput>,
) -> Result<Response, AppError> {
    auth::require_user(&state, &headers).await?;

    let outcome = books::update(&state.db, id, &input).await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok(Json(outcome.data).into_response())
}
