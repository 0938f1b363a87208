use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::{created_at, AppState};
use crate::domain::{Player, PlayerInput};
use crate::error::AppError;

pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, AppError> {
    Ok(Json(state.repo.list_players().await?))
}

pub async fn get_player(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Player>, AppError> {
    state
        .repo
        .get_player(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Player {} not found", id)))
}

pub async fn get_player_by_email(
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Player>, AppError> {
    if email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    state
        .repo
        .get_player_by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No player with email {}", email.trim())))
}

pub async fn create_player(
    State(state): State<AppState>,
    body: Result<Json<PlayerInput>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Player>), AppError> {
    let Json(input) = body?;
    let input = input.normalized();
    input.validate().map_err(AppError::Validation)?;

    let player = state.repo.insert_player(&input).await?;
    let (status, headers) = created_at(format!("/api/Player/{}", player.id));
    Ok((status, headers, Json(player)))
}

pub async fn update_player(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    body: Result<Json<PlayerInput>, JsonRejection>,
) -> Result<Json<Player>, AppError> {
    let Json(input) = body?;
    if let Some(body_id) = input.id {
        if body_id != id {
            return Err(AppError::BadRequest(format!(
                "Body id {} does not match path id {}",
                body_id, id
            )));
        }
    }
    let input = input.normalized();
    input.validate().map_err(AppError::Validation)?;

    state
        .repo
        .update_player(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Player {} not found", id)))
}

pub async fn delete_player(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_player(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Player {} not found", id)))
    }
}
