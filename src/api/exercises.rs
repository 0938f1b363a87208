use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::{created_at, AppState};
use crate::domain::{Exercise, NewExercise};
use crate::error::AppError;

pub async fn list_exercises(
    State(state): State<AppState>,
) -> Result<Json<Vec<Exercise>>, AppError> {
    Ok(Json(state.repo.list_exercises().await?))
}

pub async fn get_exercise(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Exercise>, AppError> {
    state
        .repo
        .get_exercise(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Exercise {} not found", id)))
}

pub async fn create_exercise(
    State(state): State<AppState>,
    body: Result<Json<NewExercise>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Exercise>), AppError> {
    let Json(exercise) = body?;
    let exercise = exercise.normalized();
    exercise.validate().map_err(AppError::Validation)?;

    let created = state.repo.insert_exercise(&exercise).await?;
    let (status, headers) = created_at(format!("/api/Exercise/{}", created.id));
    Ok((status, headers, Json(created)))
}

/// Rejected with 409 while any workout set still uses the exercise.
pub async fn delete_exercise(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_exercise(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Exercise {} not found", id)))
    }
}
