use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures a repository operation can surface besides a validation
/// envelope. Expected conditions (not-found, conflict) carry a message;
/// storage faults carry nothing, their detail stays in the log.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// A malformed read request (e.g. a blank search term). Distinct from
    /// "no results found".
    #[error("{0}")]
    InvalidQuery(String),

    #[error("Database error has occurred")]
    Database,
}

impl RepoError {
    /// Catch an unexpected storage fault at the repository boundary:
    /// log it, discard the detail.
    pub fn database(err: sqlx::Error) -> Self {
        tracing::error!("database error: {err}");
        RepoError::Database
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("You are not logged in")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error has occurred")]
    Database,

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::InvalidQuery(msg) => AppError::BadRequest(msg),
            RepoError::Database => AppError::Database,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
