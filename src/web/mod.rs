pub mod auth;
pub mod books;
pub mod categories;
pub mod users;

use axum::Router;
use axum::routing::{delete, get, post};
use serde::Deserialize;

use crate::state::AppState;

pub const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Listing window, as passed by clients: `?search=&offset=&limit=`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Apply defaults (offset 0, limit 10) and clamp to a sane window.
    pub fn window(&self) -> (i64, i64) {
        let offset = self.offset.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (offset, limit)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/books", get(books::get_all).post(books::post_book))
        .route("/books/{id}", get(books::get_one).patch(books::patch_one))
        .route(
            "/categories",
            get(categories::get_all).post(categories::post_category),
        )
        .route("/users", get(users::get_all))
        .route("/users/me", get(users::get_me).patch(users::patch_me))
        .route("/users/me/image", post(users::post_me_image))
        .route(
            "/users/me/read",
            get(users::get_me_read)
                .post(users::post_me_read)
                .patch(users::patch_me_read),
        )
        .route("/users/me/read/{id}", delete(users::delete_me_read))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/read", get(users::get_user_read))
}
