use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// A body that is not JSON, or does not fit the target type, is a 400 with the
/// usual validation shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<crate::db::RepoError> for AppError {
    fn from(err: crate::db::RepoError) -> Self {
        use crate::db::RepoError;
        match err {
            RepoError::MissingPlayer(id) => AppError::BadRequest(format!("Player {} not found", id)),
            RepoError::MissingExercise(id) => {
                AppError::BadRequest(format!("Exercise {} not found", id))
            }
            RepoError::DuplicateEmail(email) => {
                AppError::Conflict(format!("A player with email {} already exists", email))
            }
            RepoError::DuplicateExercise(name) => {
                AppError::Conflict(format!("Exercise {} already exists", name))
            }
            RepoError::ExerciseInUse(id) => AppError::Conflict(format!(
                "Exercise {} is used by existing workout sets and cannot be deleted",
                id
            )),
            RepoError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "errors": errors }),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}
