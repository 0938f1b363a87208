//! In-memory tracker API for tests without a server.

use super::{ApiError, TrackerApi, WorkoutQuery};
use crate::domain::{
    Exercise, NewExercise, NewWorkout, Player, PlayerInput, Workout, WorkoutSet,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MockState {
    players: Vec<Player>,
    exercises: Vec<Exercise>,
    workouts: Vec<Workout>,
    next_id: i64,
    failure: Option<ApiError>,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Mock API that keeps everything in memory.
///
/// `set_offline` makes every call fail with a network error; `set_failure`
/// with any chosen error. Every call is counted, failed or not.
#[derive(Debug, Default)]
pub struct MockTrackerApi {
    state: Mutex<MockState>,
    calls: AtomicUsize,
}

impl MockTrackerApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a player as if it had been created through the API.
    pub fn with_player(self, first_name: &str, last_name: &str, position: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.next_id();
            let now = Utc::now();
            state.players.push(Player {
                id,
                email: format!("{}.{}@tide.edu", first_name, last_name).to_lowercase(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                position: position.to_string(),
                photo_url: None,
                created_at: now,
                updated_at: now,
            });
        }
        self
    }

    pub fn with_exercise(self, name: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.next_id();
            let now = Utc::now();
            state.exercises.push(Exercise {
                id,
                name: name.to_string(),
                category: None,
                created_at: now,
                updated_at: now,
            });
        }
        self
    }

    pub fn set_offline(&self, offline: bool) {
        let failure = offline.then(|| ApiError::Network("connection refused".to_string()));
        self.set_failure(failure);
    }

    pub fn set_failure(&self, failure: Option<ApiError>) {
        self.lock().failure = failure;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn players(&self) -> Vec<Player> {
        self.lock().players.clone()
    }

    pub fn workouts(&self) -> Vec<Workout> {
        self.lock().workouts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panic while holding the lock only happens inside a failing test.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, MockState>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        state.check()?;
        Ok(state)
    }
}

fn not_found(what: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::Http {
        status: 404,
        message: format!("{} {} not found", what, id),
    }
}

#[async_trait]
impl TrackerApi for MockTrackerApi {
    async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        Ok(self.begin()?.players.clone())
    }

    async fn player_by_email(&self, email: &str) -> Result<Player, ApiError> {
        self.begin()?
            .players
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| not_found("Player with email", email))
    }

    async fn create_player(&self, input: &PlayerInput) -> Result<Player, ApiError> {
        let mut state = self.begin()?;
        if state
            .players
            .iter()
            .any(|p| p.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(ApiError::Http {
                status: 409,
                message: format!("A player with email {} already exists", input.email),
            });
        }
        let id = state.next_id();
        let now = Utc::now();
        let player = Player {
            id,
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            position: input.position.clone(),
            photo_url: input.photo_url.clone(),
            created_at: now,
            updated_at: now,
        };
        state.players.push(player.clone());
        Ok(player)
    }

    async fn update_player(&self, id: i64, input: &PlayerInput) -> Result<Player, ApiError> {
        let mut state = self.begin()?;
        let player = state
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Player", id))?;
        player.email = input.email.clone();
        player.first_name = input.first_name.clone();
        player.last_name = input.last_name.clone();
        player.position = input.position.clone();
        player.photo_url = input.photo_url.clone();
        player.updated_at = Utc::now();
        Ok(player.clone())
    }

    async fn delete_player(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.begin()?;
        let before = state.players.len();
        state.players.retain(|p| p.id != id);
        if state.players.len() == before {
            return Err(not_found("Player", id));
        }
        state.workouts.retain(|w| w.player_id != id);
        Ok(())
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        let mut exercises = self.begin()?.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    async fn create_exercise(&self, input: &NewExercise) -> Result<Exercise, ApiError> {
        let mut state = self.begin()?;
        let id = state.next_id();
        let now = Utc::now();
        let exercise = Exercise {
            id,
            name: input.name.clone(),
            category: input.category.clone(),
            created_at: now,
            updated_at: now,
        };
        state.exercises.push(exercise.clone());
        Ok(exercise)
    }

    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.begin()?;
        let in_use = state
            .workouts
            .iter()
            .any(|w| w.sets.iter().any(|s| s.exercise_id == id));
        if in_use {
            return Err(ApiError::Http {
                status: 409,
                message: format!("Exercise {} is in use", id),
            });
        }
        let before = state.exercises.len();
        state.exercises.retain(|e| e.id != id);
        if state.exercises.len() == before {
            return Err(not_found("Exercise", id));
        }
        Ok(())
    }

    async fn list_workouts(&self, query: &WorkoutQuery) -> Result<Vec<Workout>, ApiError> {
        let state = self.begin()?;
        let from = query
            .start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let until = query
            .end_date
            .map(|d| (d + Duration::days(1)).and_time(NaiveTime::MIN).and_utc());
        let mut workouts: Vec<Workout> = state
            .workouts
            .iter()
            .filter(|w| query.player_id.map_or(true, |id| w.player_id == id))
            .filter(|w| from.map_or(true, |from| w.date >= from))
            .filter(|w| until.map_or(true, |until| w.date < until))
            .cloned()
            .collect();
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(workouts)
    }

    async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ApiError> {
        let mut state = self.begin()?;
        if let Err(errors) = workout.validate() {
            return Err(ApiError::Http {
                status: 400,
                message: errors.join("; "),
            });
        }
        if !state.players.iter().any(|p| p.id == workout.player_id) {
            return Err(ApiError::Http {
                status: 400,
                message: format!("Player {} not found", workout.player_id),
            });
        }

        let id = state.next_id();
        let now = Utc::now();
        let mut sets = Vec::with_capacity(workout.sets.len());
        for set in &workout.sets {
            let exercise = state
                .exercises
                .iter()
                .find(|e| e.id == set.exercise_id)
                .cloned()
                .ok_or_else(|| ApiError::Http {
                    status: 400,
                    message: format!("Exercise {} not found", set.exercise_id),
                })?;
            let set_id = state.next_id();
            sets.push(WorkoutSet {
                id: set_id,
                workout_id: id,
                exercise_id: set.exercise_id,
                set_number: set.set_number,
                reps: set.reps,
                weight: set.weight.round_dp(2),
                exercise: Some(exercise),
            });
        }
        sets.sort_by_key(|s| s.set_number);

        let created = Workout {
            id,
            player_id: workout.player_id,
            date: workout.date,
            notes: workout.notes.clone(),
            created_at: now,
            updated_at: now,
            sets,
        };
        state.workouts.push(created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, NewWorkoutSet};

    #[tokio::test]
    async fn offline_mock_fails_every_call() {
        let api = MockTrackerApi::new().with_player("Ana", "Lee", "G");
        assert_eq!(api.list_players().await.unwrap().len(), 1);

        api.set_offline(true);
        assert!(api.list_players().await.unwrap_err().is_network());
        assert_eq!(api.calls(), 2);

        api.set_offline(false);
        assert!(api.list_players().await.is_ok());
    }

    #[tokio::test]
    async fn exercise_in_use_cannot_be_deleted() {
        let api = MockTrackerApi::new()
            .with_player("Ana", "Lee", "G")
            .with_exercise("Squat");
        let workout = NewWorkout {
            player_id: 1,
            date: Utc::now(),
            notes: None,
            sets: vec![NewWorkoutSet {
                exercise_id: 2,
                set_number: 1,
                reps: 5,
                weight: Decimal::from(225),
            }],
        };
        let created = api.create_workout(&workout).await.unwrap();
        assert_eq!(created.sets[0].exercise.as_ref().unwrap().name, "Squat");

        let err = api.delete_exercise(2).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 409, .. }));
    }
}
