//! Client side of the tracker: API access, local store and dual-write sync.

use crate::domain::{Exercise, NewExercise, NewWorkout, Player, PlayerInput, Workout};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod mock;
pub mod store;
pub mod sync;

pub use http::HttpTrackerApi;
pub use mock::MockTrackerApi;
pub use store::{LocalStore, StoreError};
pub use sync::{Notice, NoticeKind, PlayerForm, SessionForm, TrackerClient, WriteOrigin};

/// Remote tracker API.
///
/// One request per call: no retries, no backoff. Any non-2xx answer is an
/// `ApiError::Http`.
#[async_trait]
pub trait TrackerApi: Send + Sync + fmt::Debug {
    async fn list_players(&self) -> Result<Vec<Player>, ApiError>;

    /// `GET /api/Player/email/{email}`.
    async fn player_by_email(&self, email: &str) -> Result<Player, ApiError>;

    async fn create_player(&self, input: &PlayerInput) -> Result<Player, ApiError>;

    async fn update_player(&self, id: i64, input: &PlayerInput) -> Result<Player, ApiError>;

    async fn delete_player(&self, id: i64) -> Result<(), ApiError>;

    async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError>;

    async fn create_exercise(&self, input: &NewExercise) -> Result<Exercise, ApiError>;

    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError>;

    async fn list_workouts(&self, query: &WorkoutQuery) -> Result<Vec<Workout>, ApiError>;

    async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ApiError>;
}

/// Filter for `GET /api/Workout`. Dates are inclusive calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutQuery {
    pub player_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl WorkoutQuery {
    /// Query-string pairs, omitting unset fields.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.player_id {
            pairs.push(("playerId", id.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never got an answer (refused, DNS, reset).
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Refused before any request was made.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert!(err.is_network());

        let err = ApiError::Http {
            status: 409,
            message: "Exercise 3 is in use".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 409: Exercise 3 is in use");
        assert!(!err.is_network());
    }

    #[test]
    fn workout_query_pairs_skip_unset() {
        assert!(WorkoutQuery::default().to_pairs().is_empty());

        let query = WorkoutQuery {
            player_id: Some(4),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: None,
        };
        assert_eq!(
            query.to_pairs(),
            vec![("playerId", "4".to_string()), ("startDate", "2025-03-01".to_string())]
        );
    }
}
