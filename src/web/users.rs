use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::db::models::UserView;
use crate::db::queries::users::UserPatch;
use crate::db::queries::{books, read_books, users};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::{ListQuery, auth};

/// GET /users — paginated listing without password material.
pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let (offset, limit) = query.window();
    let page = users::read_all(&state.db, offset, limit).await?;
    Ok(Json(page).into_response())
}

/// GET /users/me — the authenticated user.
pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;
    Ok(Json(UserView::from(user)).into_response())
}

/// PATCH /users/me — partial update of password and/or name.
pub async fn patch_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(patch): Json<UserPatch>,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let outcome = users::update(&state.db, user.id, &patch).await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok(Json(outcome.data).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePayload {
    pub img_url: String,
}

/// POST /users/me/image — replace the profile image reference only.
pub async fn post_me_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ImagePayload>,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let outcome = users::update_image(&state.db, user.id, &payload.img_url).await?;
    Ok(Json(outcome.data).into_response())
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = users::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserView::from(user)).into_response())
}

/// GET /users/{id}/read — reviews of any user.
pub async fn get_user_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    if users::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let (offset, limit) = query.window();
    let page = read_books::find_by_user(&state.db, id, offset, limit).await?;
    Ok(Json(page).into_response())
}

/// GET /users/me/read — the authenticated user's reviews.
pub async fn get_me_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;
    let (offset, limit) = query.window();
    let page = read_books::find_by_user(&state.db, user.id, offset, limit).await?;
    Ok(Json(page).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadBookPayload {
    pub book_id: Option<i64>,
    pub grade: Option<i32>,
    pub review: Option<String>,
}

/// POST /users/me/read — review a book. One review per (user, book).
pub async fn post_me_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReadBookPayload>,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let Some(book_id) = payload.book_id else {
        return Err(AppError::NotFound("Book not found".to_string()));
    };
    // The book must exist; read_one reports the 404.
    books::read_one(&state.db, book_id).await?;

    if read_books::get_by_user_and_book(&state.db, user.id, book_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Review already exists.".to_string()));
    }

    let review = payload.review.unwrap_or_default();
    let outcome =
        read_books::create(&state.db, user.id, book_id, payload.grade, &review).await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok((StatusCode::CREATED, Json(outcome.data)).into_response())
}

/// PATCH /users/me/read — update a review; omitted fields keep their
/// stored values.
pub async fn patch_me_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReadBookPayload>,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let Some(book_id) = payload.book_id else {
        return Err(AppError::NotFound("Review does not exist.".to_string()));
    };
    if read_books::get_by_user_and_book(&state.db, user.id, book_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Review does not exist.".to_string()));
    }

    let outcome = read_books::update(
        &state.db,
        user.id,
        book_id,
        payload.grade,
        payload.review.as_deref(),
    )
    .await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok(Json(outcome.data).into_response())
}

/// DELETE /users/me/read/{id} — remove one of the caller's own reviews.
pub async fn delete_me_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let read_book = read_books::find_by_id(&state.db, id)
        .await?
        .filter(|rb| rb.user_id == user.id)
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    read_books::delete_by_id(&state.db, read_book.id).await?;
    Ok(Json(read_book).into_response())
}
