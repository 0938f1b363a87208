//! `TrackerClient`: in-memory cache over a `TrackerApi` and a `LocalStore`.
//!
//! Player and workout writes try the API first. On any failure (network or
//! non-OK) the change is applied to the cache and store only. There is no
//! replay once the API comes back.

use super::store::{LIFTS_KEY, PLAYERS_KEY, SESSIONS_KEY, STATS_KEY};
use super::{ApiError, ClientError, HttpTrackerApi, LocalStore, TrackerApi, WorkoutQuery};
use crate::config::ClientConfig;
use crate::domain::{
    Exercise, GameType, NewExercise, NewWorkout, Player, PlayerInput, RosterPlayer, SessionLog,
    ShotLine, StatEntry, TimeMs, Workout, WorkoutSet,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Where a write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrigin {
    Remote,
    LocalFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Transient message for the user, drained by the UI after each action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Player add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerForm {
    /// Account email of the signed-in user.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    /// Data URL or link; `None` for no photo.
    pub photo: Option<String>,
}

impl PlayerForm {
    fn to_input(&self, id: Option<i64>) -> PlayerInput {
        PlayerInput {
            id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            position: self.position.clone(),
            photo_url: self.photo.clone(),
        }
        .normalized()
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Combined session + shooting stats form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionForm {
    pub player_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub session_type: GameType,
    pub notes: String,
    pub three_point: ShotLine,
    pub two_point: ShotLine,
    pub free_throw: ShotLine,
    pub assists: u32,
    pub rebounds: u32,
}

pub struct TrackerClient {
    api: Arc<dyn TrackerApi>,
    store: LocalStore,
    players: Vec<RosterPlayer>,
    sessions: Vec<SessionLog>,
    stats: Vec<StatEntry>,
    lifting: Vec<Workout>,
    exercises: Vec<Exercise>,
    notices: Vec<Notice>,
}

impl TrackerClient {
    /// Build a client with whatever the store already holds.
    pub async fn open(api: Arc<dyn TrackerApi>, store: LocalStore) -> Self {
        let players = store.load(PLAYERS_KEY).await;
        let sessions = store.load(SESSIONS_KEY).await;
        let stats = store.load(STATS_KEY).await;
        let lifting = store.load(LIFTS_KEY).await;
        Self {
            api,
            store,
            players,
            sessions,
            stats,
            lifting,
            exercises: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// HTTP API and file store as configured by the environment.
    pub async fn from_config(config: &ClientConfig) -> Self {
        let api = Arc::new(HttpTrackerApi::new(config.api_base_url.clone()));
        Self::open(api, LocalStore::new(config.cache_dir.clone())).await
    }

    pub fn players(&self) -> &[RosterPlayer] {
        &self.players
    }

    /// Session logs, newest first.
    pub fn sessions(&self) -> &[SessionLog] {
        &self.sessions
    }

    /// Stat entries, newest first.
    pub fn stats(&self) -> &[StatEntry] {
        &self.stats
    }

    pub fn lifting_workouts(&self) -> &[Workout] {
        &self.lifting
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Take every notice recorded since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            message: message.into(),
        });
    }

    // =========================================================================
    // Loads
    // =========================================================================

    /// Players, exercises and workouts fetched concurrently.
    pub async fn refresh(&mut self, query: &WorkoutQuery) {
        let (players, exercises, workouts) = futures::join!(
            self.api.list_players(),
            self.api.list_exercises(),
            self.api.list_workouts(query)
        );
        self.apply_players(players).await;
        self.apply_exercises(exercises);
        self.apply_workouts(workouts).await;
    }

    /// Roster from the API.
    ///
    /// If the API cannot be reached the stored roster is used; a non-OK
    /// answer leaves the roster empty.
    pub async fn load_players(&mut self) -> &[RosterPlayer] {
        let result = self.api.list_players().await;
        self.apply_players(result).await;
        &self.players
    }

    async fn apply_players(&mut self, result: Result<Vec<Player>, ApiError>) {
        match result {
            Ok(players) => {
                self.players = players.iter().map(RosterPlayer::from).collect();
                mirror(&self.store, PLAYERS_KEY, &self.players).await;
            }
            Err(err) if err.is_network() => {
                warn!(error = %err, "Player API unreachable, using stored roster");
                self.players = self.store.load(PLAYERS_KEY).await;
            }
            Err(err) => {
                warn!(error = %err, "Player API rejected the request");
                self.players.clear();
            }
        }
    }

    /// Exercise library. Failures leave it empty.
    pub async fn load_exercises(&mut self) -> &[Exercise] {
        let result = self.api.list_exercises().await;
        self.apply_exercises(result);
        &self.exercises
    }

    fn apply_exercises(&mut self, result: Result<Vec<Exercise>, ApiError>) {
        match result {
            Ok(exercises) => self.exercises = exercises,
            Err(err) => {
                warn!(error = %err, "Failed to load exercises");
                self.exercises.clear();
                self.notify(NoticeKind::Error, "Failed to load exercises.");
            }
        }
    }

    /// Lifting workouts matching `query`. Failures leave the list empty.
    pub async fn load_workouts(&mut self, query: &WorkoutQuery) -> &[Workout] {
        let result = self.api.list_workouts(query).await;
        self.apply_workouts(result).await;
        &self.lifting
    }

    async fn apply_workouts(&mut self, result: Result<Vec<Workout>, ApiError>) {
        match result {
            Ok(workouts) => {
                self.lifting = workouts;
                mirror(&self.store, LIFTS_KEY, &self.lifting).await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to load workouts");
                self.lifting.clear();
                self.notify(NoticeKind::Error, "Failed to load workouts.");
            }
        }
    }

    /// Look up the signed-in account by email.
    pub async fn current_user(&self, email: &str) -> Result<Player, ClientError> {
        if email.trim().is_empty() {
            return Err(ClientError::Rejected(
                "User not authenticated. Please log in again.".to_string(),
            ));
        }
        Ok(self.api.player_by_email(email.trim()).await?)
    }

    // =========================================================================
    // Players
    // =========================================================================

    pub async fn add_player(
        &mut self,
        form: PlayerForm,
    ) -> Result<(RosterPlayer, WriteOrigin), ClientError> {
        if form.email.trim().is_empty() {
            return Err(ClientError::Rejected(
                "User not authenticated. Please log in again.".to_string(),
            ));
        }

        let (player, origin) = match self.api.create_player(&form.to_input(None)).await {
            Ok(created) => (RosterPlayer::from(&created), WriteOrigin::Remote),
            Err(err) => {
                warn!(error = %err, "Add player failed remotely, saving locally");
                let player = RosterPlayer {
                    id: TimeMs::now().as_i64().to_string(),
                    name: form.display_name(),
                    position: form.position.trim().to_string(),
                    photo: form.photo.clone(),
                };
                (player, WriteOrigin::LocalFallback)
            }
        };

        self.players.push(player.clone());
        self.store.save(PLAYERS_KEY, &self.players).await?;
        self.notify_write(origin, "Player added successfully!");
        info!(player_id = %player.id, ?origin, "Player added");
        Ok((player, origin))
    }

    pub async fn update_player(
        &mut self,
        id: &str,
        form: PlayerForm,
    ) -> Result<WriteOrigin, ClientError> {
        if !self.players.iter().any(|p| p.id == id) {
            self.notify(NoticeKind::Error, "Player not found!");
            return Err(ClientError::Rejected("Player not found!".to_string()));
        }

        let origin = match id.parse::<i64>() {
            Ok(remote_id) => match self
                .api
                .update_player(remote_id, &form.to_input(Some(remote_id)))
                .await
            {
                Ok(_) => WriteOrigin::Remote,
                Err(err) => {
                    warn!(error = %err, player_id = id, "Update player failed remotely, saving locally");
                    WriteOrigin::LocalFallback
                }
            },
            Err(_) => WriteOrigin::LocalFallback,
        };

        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.name = form.display_name();
            player.position = form.position.trim().to_string();
            player.photo = form.photo;
        }
        self.store.save(PLAYERS_KEY, &self.players).await?;
        self.notify_write(origin, "Player updated successfully!");
        Ok(origin)
    }

    /// Remove a player together with their sessions, stats and workouts.
    pub async fn delete_player(&mut self, id: &str) -> Result<WriteOrigin, ClientError> {
        if !self.players.iter().any(|p| p.id == id) {
            self.notify(NoticeKind::Error, "Player not found!");
            return Err(ClientError::Rejected("Player not found!".to_string()));
        }

        let remote_id = id.parse::<i64>().ok();
        let origin = match remote_id {
            Some(remote_id) => match self.api.delete_player(remote_id).await {
                Ok(()) => WriteOrigin::Remote,
                Err(err) => {
                    warn!(error = %err, player_id = id, "Delete player failed remotely, deleting locally");
                    WriteOrigin::LocalFallback
                }
            },
            None => WriteOrigin::LocalFallback,
        };

        self.players.retain(|p| p.id != id);
        self.sessions.retain(|s| s.player_id != id);
        self.stats.retain(|s| s.player_id != id);
        if let Some(remote_id) = remote_id {
            self.lifting.retain(|w| w.player_id != remote_id);
        }

        self.store.save(PLAYERS_KEY, &self.players).await?;
        self.store.save(SESSIONS_KEY, &self.sessions).await?;
        self.store.save(STATS_KEY, &self.stats).await?;
        self.store.save(LIFTS_KEY, &self.lifting).await?;
        self.notify_write(origin, "Player deleted successfully!");
        info!(player_id = id, ?origin, "Player deleted");
        Ok(origin)
    }

    // =========================================================================
    // Sessions and stats (local only)
    // =========================================================================

    /// Log a session and its stat line. Makes are clamped to attempts.
    pub async fn add_session_entry(
        &mut self,
        form: SessionForm,
    ) -> Result<(SessionLog, StatEntry), ClientError> {
        if form.player_id.is_empty() || !self.players.iter().any(|p| p.id == form.player_id) {
            self.notify(NoticeKind::Error, "Please select a player!");
            return Err(ClientError::Rejected("Please select a player!".to_string()));
        }

        let id = TimeMs::now().as_i64();
        let timestamp = Utc::now().to_rfc3339();
        let session = SessionLog {
            id,
            player_id: form.player_id.clone(),
            date: form.date.clone(),
            session_type: form.session_type,
            notes: form.notes,
            timestamp: timestamp.clone(),
        };

        let three = form.three_point.clamped();
        let two = form.two_point.clamped();
        let ft = form.free_throw.clamped();
        let entry = StatEntry {
            id: id + 1,
            player_id: form.player_id,
            date: form.date,
            game_type: form.session_type,
            three_point_makes: three.makes,
            three_point_attempts: three.attempts,
            two_point_makes: two.makes,
            two_point_attempts: two.attempts,
            free_throw_makes: ft.makes,
            free_throw_attempts: ft.attempts,
            assists: form.assists,
            rebounds: form.rebounds,
            timestamp,
        };

        self.sessions.insert(0, session.clone());
        self.stats.insert(0, entry.clone());
        self.store.save(SESSIONS_KEY, &self.sessions).await?;
        self.store.save(STATS_KEY, &self.stats).await?;
        self.notify(
            NoticeKind::Success,
            "Workout and statistics added successfully!",
        );
        Ok((session, entry))
    }

    /// Returns false if no entry had this id.
    pub async fn delete_stat_entry(&mut self, id: i64) -> Result<bool, ClientError> {
        let before = self.stats.len();
        self.stats.retain(|s| s.id != id);
        if self.stats.len() == before {
            return Ok(false);
        }
        self.store.save(STATS_KEY, &self.stats).await?;
        self.notify(NoticeKind::Success, "Statistics deleted successfully!");
        Ok(true)
    }

    /// Returns false if no session had this id.
    pub async fn delete_session(&mut self, id: i64) -> Result<bool, ClientError> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return Ok(false);
        }
        self.store.save(SESSIONS_KEY, &self.sessions).await?;
        self.notify(NoticeKind::Success, "Workout deleted successfully!");
        Ok(true)
    }

    // =========================================================================
    // Lifting
    // =========================================================================

    /// Save a lifting workout.
    ///
    /// A workout without sets, or for a player not on the roster, is refused
    /// before the API is called.
    pub async fn add_workout(
        &mut self,
        workout: NewWorkout,
    ) -> Result<(Workout, WriteOrigin), ClientError> {
        let on_roster = self
            .players
            .iter()
            .any(|p| p.id == workout.player_id.to_string());
        if workout.sets.is_empty() || !on_roster {
            let message = "Please select player, date, and add at least one set.";
            self.notify(NoticeKind::Error, message);
            return Err(ClientError::Rejected(message.to_string()));
        }

        let (saved, origin) = match self.api.create_workout(&workout).await {
            Ok(created) => (created, WriteOrigin::Remote),
            Err(err) => {
                warn!(error = %err, player_id = workout.player_id, "Add workout failed remotely, saving locally");
                (self.local_workout(&workout), WriteOrigin::LocalFallback)
            }
        };

        self.lifting.insert(0, saved.clone());
        self.store.save(LIFTS_KEY, &self.lifting).await?;
        self.notify_write(origin, "Workout saved!");
        Ok((saved, origin))
    }

    fn local_workout(&self, workout: &NewWorkout) -> Workout {
        let id = TimeMs::now().as_i64();
        let now = Utc::now();
        let mut sets: Vec<WorkoutSet> = workout
            .sets
            .iter()
            .enumerate()
            .map(|(i, set)| WorkoutSet {
                id: i as i64 + 1,
                workout_id: id,
                exercise_id: set.exercise_id,
                set_number: set.set_number,
                reps: set.reps,
                weight: set.weight.round_dp(2),
                exercise: self
                    .exercises
                    .iter()
                    .find(|e| e.id == set.exercise_id)
                    .cloned(),
            })
            .collect();
        sets.sort_by_key(|s| s.set_number);

        Workout {
            id,
            player_id: workout.player_id,
            date: workout.date,
            notes: workout.notes.clone(),
            created_at: now,
            updated_at: now,
            sets,
        }
    }

    /// Add to the exercise library. API only; failures are returned.
    pub async fn add_exercise(&mut self, exercise: NewExercise) -> Result<Exercise, ClientError> {
        let exercise = exercise.normalized();
        if exercise.name.is_empty() {
            return Err(ClientError::Rejected("Exercise name is required".to_string()));
        }
        match self.api.create_exercise(&exercise).await {
            Ok(created) => {
                self.load_exercises().await;
                Ok(created)
            }
            Err(err) => {
                self.notify(NoticeKind::Error, "Failed to add exercise");
                Err(err.into())
            }
        }
    }

    /// Remove from the exercise library. Refused by the API while in use.
    pub async fn delete_exercise(&mut self, id: i64) -> Result<(), ClientError> {
        match self.api.delete_exercise(id).await {
            Ok(()) => {
                self.load_exercises().await;
                Ok(())
            }
            Err(err) => {
                self.notify(NoticeKind::Error, "Failed to delete exercise");
                Err(err.into())
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn notify_write(&mut self, origin: WriteOrigin, message: &str) {
        match origin {
            WriteOrigin::Remote => self.notify(NoticeKind::Success, message),
            WriteOrigin::LocalFallback => {
                self.notify(NoticeKind::Success, message);
                self.notify(NoticeKind::Info, "Server unavailable, saved on this device only.");
            }
        }
    }
}

/// Mirror API data to the store, logging instead of failing.
async fn mirror<T: Serialize>(store: &LocalStore, key: &str, items: &[T]) {
    if let Err(err) = store.save(key, items).await {
        warn!(key, error = %err, "Failed to mirror data locally");
    }
}
