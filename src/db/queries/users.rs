use serde::Deserialize;

use crate::db::DbPool;
use crate::db::models::{User, UserView};
use crate::db::paging::{Page, paged_query};
use crate::error::RepoError;
use crate::password;
use crate::sanitize::sanitize;
use crate::validation::{FieldError, Outcome};

/// Registration payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Partial update for the mutable user fields. Omitted fields are left
/// untouched and not validated; the patch translates to one of a fixed
/// set of UPDATE statements, never a dynamically assembled column list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub password: Option<String>,
    pub name: Option<String>,
}

pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, RepoError> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, name, img_url FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(RepoError::database)
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, RepoError> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, name, img_url FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(RepoError::database)
}

/// Paginated user listing for public reads; selects only the safe columns.
pub async fn read_all(pool: &DbPool, offset: i64, limit: i64) -> Result<Page<UserView>, RepoError> {
    paged_query(
        pool,
        "users",
        "SELECT id, username, name, img_url FROM users ORDER BY id LIMIT ? OFFSET ?",
        &[],
        offset,
        limit,
        None,
    )
    .await
}

/// Register a user. The uniqueness pre-check is a direct lookup; the
/// UNIQUE constraint on username closes the race. The password leaves
/// this function only as an argon2 hash, and never in the returned data.
pub async fn create_user(pool: &DbPool, input: &NewUser) -> Result<Outcome<UserView>, RepoError> {
    let username = sanitize(&input.username);
    let name = sanitize(&input.name);

    let mut errors = Vec::new();
    if find_by_username(pool, &username).await?.is_some() {
        errors.push(FieldError::new("username", "Username is already registered"));
    }
    if username.len() < 3 {
        errors.push(FieldError::new(
            "username",
            "Username must be at least 3 characters",
        ));
    }
    if input.password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name must not be empty"));
    }
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }

    let password_hash = password::hash(&input.password);
    let result = sqlx::query("INSERT INTO users (username, password_hash, name) VALUES (?, ?, ?)")
        .bind(&username)
        .bind(&password_hash)
        .bind(&name)
        .execute(pool)
        .await;

    if let Err(err) = result {
        if crate::db::queries::unique::is_unique_violation(&err) {
            return Ok(Outcome::invalid(vec![FieldError::new(
                "username",
                "Username is already registered",
            )]));
        }
        return Err(RepoError::database(err));
    }

    // AnyPool last_insert_id is not portable — fetch back by username.
    let user = find_by_username(pool, &username)
        .await?
        .ok_or(RepoError::Database)?;
    Ok(Outcome::ok(UserView::from(user)))
}

/// Apply a partial update to password and/or name. The user must already
/// exist; the password is re-hashed only when supplied.
pub async fn update(
    pool: &DbPool,
    id: i64,
    patch: &UserPatch,
) -> Result<Outcome<UserView>, RepoError> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "User with id {id} does not exist"
        )));
    }

    let name = patch.name.as_deref().map(sanitize);

    let mut errors = Vec::new();
    if let Some(password) = &patch.password
        && password.len() < 6
    {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if let Some(name) = &name
        && name.is_empty()
    {
        errors.push(FieldError::new("name", "Name must not be empty"));
    }
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }

    let password_hash = patch.password.as_deref().map(password::hash);

    // One fixed statement per field combination; an empty patch is a no-op.
    let result = match (&password_hash, &name) {
        (Some(hash), Some(name)) => Some(
            sqlx::query("UPDATE users SET password_hash = ?, name = ? WHERE id = ?")
                .bind(hash)
                .bind(name)
                .bind(id)
                .execute(pool)
                .await,
        ),
        (Some(hash), None) => Some(
            sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
                .bind(hash)
                .bind(id)
                .execute(pool)
                .await,
        ),
        (None, Some(name)) => Some(
            sqlx::query("UPDATE users SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(pool)
                .await,
        ),
        (None, None) => None,
    };
    if let Some(result) = result {
        result.map_err(RepoError::database)?;
    }

    let user = find_by_id(pool, id).await?.ok_or(RepoError::Database)?;
    Ok(Outcome::ok(UserView::from(user)))
}

/// Replace the user's image reference. Independent of [`update`] so an
/// image change never re-validates password or name.
pub async fn update_image(
    pool: &DbPool,
    id: i64,
    img_url: &str,
) -> Result<Outcome<UserView>, RepoError> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "User with id {id} does not exist"
        )));
    }

    let img_url = sanitize(img_url);
    sqlx::query("UPDATE users SET img_url = ? WHERE id = ?")
        .bind(&img_url)
        .bind(id)
        .execute(pool)
        .await
        .map_err(RepoError::database)?;

    let user = find_by_id(pool, id).await?.ok_or(RepoError::Database)?;
    Ok(Outcome::ok(UserView::from(user)))
}
