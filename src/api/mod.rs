pub mod exercises;
pub mod health;
pub mod lifts;
pub mod players;
pub mod workouts;

use crate::db::Repository;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/api/Player",
            get(players::list_players).post(players::create_player),
        )
        .route(
            "/api/Player/:id",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route("/api/Player/email/:email", get(players::get_player_by_email))
        .route("/api/Lift", get(lifts::list_lifts).post(lifts::create_lift))
        .route("/api/Lift/exercises", get(lifts::exercise_names))
        .route("/api/Lift/:id", get(lifts::get_lift))
        .route("/api/Lift/player/:id", get(lifts::lifts_for_player))
        .route("/api/Lift/history/player/:id", get(lifts::lift_history))
        .route(
            "/api/Exercise",
            get(exercises::list_exercises).post(exercises::create_exercise),
        )
        .route(
            "/api/Exercise/:id",
            get(exercises::get_exercise).delete(exercises::delete_exercise),
        )
        .route(
            "/api/Workout",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/api/Workout/:id",
            get(workouts::get_workout).delete(workouts::delete_workout),
        )
        .layer(cors)
        .with_state(state)
}

/// `201 Created` headers pointing at the new resource.
pub(crate) fn created_at(path: String) -> (StatusCode, HeaderMap) {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&path) {
        headers.insert(header::LOCATION, value);
    }
    (StatusCode::CREATED, headers)
}
