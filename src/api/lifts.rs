use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::{created_at, AppState};
use crate::domain::{LiftHistory, LiftView, NewLift, DEFAULT_EXERCISES};
use crate::error::AppError;

/// Fixed list of exercise names offered in the lift form.
pub async fn exercise_names() -> Json<Vec<&'static str>> {
    Json(DEFAULT_EXERCISES.to_vec())
}

pub async fn list_lifts(State(state): State<AppState>) -> Result<Json<Vec<LiftView>>, AppError> {
    let lifts = state.repo.list_lifts().await?;
    Ok(Json(
        lifts
            .into_iter()
            .map(|(lift, player)| LiftView::new(lift, player))
            .collect(),
    ))
}

pub async fn lifts_for_player(
    Path(player_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LiftView>>, AppError> {
    let lifts = state.repo.lifts_for_player(player_id).await?;
    Ok(Json(
        lifts
            .into_iter()
            .map(|(lift, player)| LiftView::new(lift, player))
            .collect(),
    ))
}

pub async fn get_lift(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<LiftView>, AppError> {
    let (lift, player) = state
        .repo
        .get_lift(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lift {} not found", id)))?;
    Ok(Json(LiftView::new(lift, player)))
}

pub async fn create_lift(
    State(state): State<AppState>,
    body: Result<Json<NewLift>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<LiftView>), AppError> {
    let Json(lift) = body?;
    lift.validate().map_err(AppError::Validation)?;

    let created = state.repo.insert_lift(&lift).await?;
    let player = state.repo.get_player(created.player_id).await?;
    let (status, headers) = created_at(format!("/api/Lift/{}", created.id));
    Ok((status, headers, Json(LiftView::new(created, player))))
}

pub async fn lift_history(
    Path(player_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LiftHistory>>, AppError> {
    Ok(Json(state.repo.lift_history_for_player(player_id).await?))
}
