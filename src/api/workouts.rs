use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::api::{created_at, AppState};
use crate::db::repo::WorkoutFilter;
use crate::domain::{NewWorkout, TimeMs, Workout};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutsQuery {
    pub player_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Bound parsed from a `startDate`/`endDate` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBound {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl DateBound {
    fn parse(field: &str, raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(DateBound::Day(day));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| DateBound::Instant(dt.with_timezone(&Utc)))
            .map_err(|_| {
                AppError::BadRequest(format!(
                    "{} must be YYYY-MM-DD or an RFC 3339 timestamp",
                    field
                ))
            })
    }

    /// Inclusive lower bound: start of the day, or the instant itself.
    fn lower(self) -> TimeMs {
        match self {
            DateBound::Day(day) => TimeMs::from(day.and_time(NaiveTime::MIN).and_utc()),
            DateBound::Instant(dt) => TimeMs::from(dt),
        }
    }

    /// Exclusive upper bound: start of the next day, or just past the instant.
    fn upper(self) -> TimeMs {
        match self {
            DateBound::Day(day) => {
                let next = day + Duration::days(1);
                TimeMs::from(next.and_time(NaiveTime::MIN).and_utc())
            }
            DateBound::Instant(dt) => TimeMs::new(TimeMs::from(dt).as_i64() + 1),
        }
    }
}

fn build_filter(params: &WorkoutsQuery) -> Result<WorkoutFilter, AppError> {
    let from = params
        .start_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| DateBound::parse("startDate", s))
        .transpose()?
        .map(DateBound::lower);
    let until = params
        .end_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| DateBound::parse("endDate", s))
        .transpose()?
        .map(DateBound::upper);

    if let (Some(from), Some(until)) = (from, until) {
        if from >= until {
            return Err(AppError::BadRequest("startDate must be <= endDate".into()));
        }
    }

    Ok(WorkoutFilter {
        player_id: params.player_id,
        from,
        until,
    })
}

pub async fn list_workouts(
    Query(params): Query<WorkoutsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Workout>>, AppError> {
    let filter = build_filter(&params)?;
    Ok(Json(state.repo.query_workouts(&filter).await?))
}

pub async fn get_workout(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Workout>, AppError> {
    state
        .repo
        .get_workout(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", id)))
}

pub async fn create_workout(
    State(state): State<AppState>,
    body: Result<Json<NewWorkout>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Workout>), AppError> {
    let Json(workout) = body?;
    workout.validate().map_err(AppError::Validation)?;

    let created = state.repo.insert_workout(&workout).await?;
    let (status, headers) = created_at(format!("/api/Workout/{}", created.id));
    Ok((status, headers, Json(created)))
}

pub async fn delete_workout(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_workout(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Workout {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(start: Option<&str>, end: Option<&str>) -> WorkoutsQuery {
        WorkoutsQuery {
            player_id: None,
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn date_only_end_includes_whole_day() {
        let filter = build_filter(&query(Some("2025-03-01"), Some("2025-03-01"))).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(filter.from, Some(TimeMs::from(start)));
        assert_eq!(filter.until, Some(TimeMs::from(next)));
    }

    #[test]
    fn rfc3339_bounds_are_exact() {
        let filter = build_filter(&query(None, Some("2025-03-01T10:00:00Z"))).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(filter.until, Some(TimeMs::new(TimeMs::from(at).as_i64() + 1)));
        assert!(filter.from.is_none());
    }

    #[test]
    fn inverted_window_rejected() {
        let err = build_filter(&query(Some("2025-03-05"), Some("2025-03-01"))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn garbage_date_rejected() {
        let err = build_filter(&query(Some("last week"), None)).unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.starts_with("startDate")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn blank_dates_ignored() {
        let filter = build_filter(&query(Some(""), Some("  "))).unwrap();
        assert_eq!(filter, WorkoutFilter::default());
    }
}
