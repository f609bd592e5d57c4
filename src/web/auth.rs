use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, KeyInit, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::db::models::User;
use crate::db::queries::users;
use crate::error::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Create a signed bearer token: `{user_id}:{expiry}:{hex_signature}`.
pub fn sign_token(user_id: i64, secret: &[u8], ttl_hours: u64) -> String {
    let expiry = chrono::Utc::now().timestamp() + (ttl_hours * 3600) as i64;
    let payload = format!("{user_id}:{expiry}");
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    let sig = hex::encode(mac.finalize().into_bytes());
    format!("{payload}:{sig}")
}

/// Verify a bearer token. Returns the user id if valid and not expired.
pub fn verify_token(token: &str, secret: &[u8]) -> Option<i64> {
    let parts: Vec<&str> = token.splitn(3, ':').collect();
    if parts.len() != 3 {
        return None;
    }
    let user_id: i64 = parts[0].parse().ok()?;
    let expiry: i64 = parts[1].parse().ok()?;
    let sig_hex = parts[2];

    // Check expiry
    if chrono::Utc::now().timestamp() > expiry {
        return None;
    }

    // Verify HMAC
    let payload = format!("{}:{}", parts[0], parts[1]);
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());

    let expected = hex::decode(sig_hex).ok()?;
    mac.verify_slice(&expected).ok()?;

    Some(user_id)
}

/// Resolve the `Authorization: Bearer` header to a user row, if the
/// token checks out and the user still exists.
pub async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<User>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return Ok(None);
    };

    let secret = state.config.server.session_secret.as_bytes();
    let Some(user_id) = verify_token(token, secret) else {
        return Ok(None);
    };

    Ok(users::find_by_id(&state.db, user_id).await?)
}

/// Like [`current_user`], but an absent or invalid token is a 401.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    current_user(state, headers)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// POST /register — create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<users::NewUser>,
) -> Result<Response, AppError> {
    let outcome = users::create_user(&state.db, &input).await?;
    if !outcome.success {
        return Ok((StatusCode::BAD_REQUEST, Json(outcome.validation)).into_response());
    }
    Ok((StatusCode::CREATED, Json(outcome.data)).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// POST /login — verify credentials and issue a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, AppError> {
    let user = users::find_by_username(&state.db, &payload.username).await?;

    let Some(user) = user.filter(|u| crate::password::compare(&payload.password, &u.password_hash))
    else {
        tracing::info!("login failed: user={}", payload.username);
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Invalid username or password" })),
        )
            .into_response());
    };

    tracing::info!("login: user={}", user.username);

    let secret = state.config.server.session_secret.as_bytes();
    let ttl = state.config.server.session_ttl_hours;
    let token = sign_token(user.id, secret, ttl);

    Ok(Json(serde_json::json!({
        "token": token,
        "expiresIn": ttl * 3600,
    }))
    .into_response())
}
