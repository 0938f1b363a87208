use super::lifts::parse_weight;
use super::Repository;
use crate::db::{is_foreign_key_violation, is_unique_violation, RepoError};
use crate::domain::{Exercise, NewExercise, NewWorkout, TimeMs, Workout, WorkoutSet};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;
use tracing::info;

/// Optional filters for `GET /api/Workout`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub player_id: Option<i64>,
    /// Inclusive lower bound on the workout date.
    pub from: Option<TimeMs>,
    /// Exclusive upper bound on the workout date.
    pub until: Option<TimeMs>,
}

impl Repository {
    // =========================================================================
    // Exercise operations
    // =========================================================================

    /// Exercise library sorted by name.
    pub async fn list_exercises(&self) -> Result<Vec<Exercise>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, name, category, created_at, updated_at FROM exercises ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| exercise_from_row(r, "")).collect())
    }

    pub async fn get_exercise(&self, id: i64) -> Result<Option<Exercise>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, name, category, created_at, updated_at FROM exercises WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| exercise_from_row(&r, "")))
    }

    /// # Errors
    /// `DuplicateExercise` if the name exists, ignoring case.
    pub async fn insert_exercise(&self, exercise: &NewExercise) -> Result<Exercise, RepoError> {
        let now = TimeMs::now();
        let result = sqlx::query(
            "INSERT INTO exercises (name, category, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&exercise.name)
        .bind(exercise.category.as_deref())
        .bind(now.as_i64())
        .bind(now.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::DuplicateExercise(exercise.name.clone())
            } else {
                RepoError::Db(e)
            }
        })?;

        let id = result.last_insert_rowid();
        info!(exercise_id = id, name = %exercise.name, "Exercise created");
        self.get_exercise(id)
            .await?
            .ok_or(RepoError::MissingExercise(id))
    }

    /// Delete an exercise that no workout set references.
    ///
    /// Returns false if no exercise has this id.
    ///
    /// # Errors
    /// `ExerciseInUse` while any workout set references it.
    pub async fn delete_exercise(&self, id: i64) -> Result<bool, RepoError> {
        let in_use: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM workout_sets WHERE exercise_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if in_use.0 > 0 {
            return Err(RepoError::ExerciseInUse(id));
        }

        // The RESTRICT foreign key still guards a set inserted after the check.
        let result = sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    RepoError::ExerciseInUse(id)
                } else {
                    RepoError::Db(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Workout operations
    // =========================================================================

    /// Insert a workout and all of its sets in one transaction.
    ///
    /// # Errors
    /// `MissingPlayer` / `MissingExercise` if a referenced row does not exist.
    pub async fn insert_workout(&self, workout: &NewWorkout) -> Result<Workout, RepoError> {
        let mut tx = self.pool.begin().await?;

        let player = sqlx::query("SELECT 1 FROM players WHERE id = ?")
            .bind(workout.player_id)
            .fetch_optional(&mut *tx)
            .await?;
        if player.is_none() {
            return Err(RepoError::MissingPlayer(workout.player_id));
        }

        for set in &workout.sets {
            let exercise = sqlx::query("SELECT 1 FROM exercises WHERE id = ?")
                .bind(set.exercise_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exercise.is_none() {
                return Err(RepoError::MissingExercise(set.exercise_id));
            }
        }

        let now = TimeMs::now();
        let result = sqlx::query(
            "INSERT INTO workouts (player_id, date, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(workout.player_id)
        .bind(TimeMs::from(workout.date).as_i64())
        .bind(workout.notes.as_deref())
        .bind(now.as_i64())
        .bind(now.as_i64())
        .execute(&mut *tx)
        .await?;
        let workout_id = result.last_insert_rowid();

        for set in &workout.sets {
            sqlx::query(
                r#"
                INSERT INTO workout_sets (workout_id, exercise_id, set_number, reps, weight, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(workout_id)
            .bind(set.exercise_id)
            .bind(set.set_number)
            .bind(set.reps)
            .bind(set.weight.round_dp(2).to_canonical_string())
            .bind(now.as_i64())
            .bind(now.as_i64())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            workout_id,
            player_id = workout.player_id,
            sets = workout.sets.len(),
            "Workout saved"
        );

        self.get_workout(workout_id)
            .await?
            .ok_or(RepoError::MissingPlayer(workout.player_id))
    }

    pub async fn get_workout(&self, id: i64) -> Result<Option<Workout>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, player_id, date, notes, created_at, updated_at FROM workouts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut workouts = vec![workout_from_row(&row)];
        self.attach_sets(&mut workouts).await?;
        Ok(workouts.pop())
    }

    /// Workouts matching `filter`, most recent date first, sets attached.
    pub async fn query_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>, sqlx::Error> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.player_id.is_some() {
            conditions.push("player_id = ?");
        }
        if filter.from.is_some() {
            conditions.push("date >= ?");
        }
        if filter.until.is_some() {
            conditions.push("date < ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT id, player_id, date, notes, created_at, updated_at FROM workouts {} ORDER BY date DESC, id DESC",
            where_clause
        );
        let mut query = sqlx::query(&sql);
        if let Some(player_id) = filter.player_id {
            query = query.bind(player_id);
        }
        if let Some(from) = filter.from {
            query = query.bind(from.as_i64());
        }
        if let Some(until) = filter.until {
            query = query.bind(until.as_i64());
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut workouts: Vec<Workout> = rows.iter().map(workout_from_row).collect();
        self.attach_sets(&mut workouts).await?;
        Ok(workouts)
    }

    /// Delete a workout and its sets. Returns false if it did not exist.
    pub async fn delete_workout(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load sets (with their exercise) for every workout, ordered by set number.
    async fn attach_sets(&self, workouts: &mut [Workout]) -> Result<(), sqlx::Error> {
        if workouts.is_empty() {
            return Ok(());
        }

        // SQLite has a 999 parameter limit; chunk to 500 for safety margin.
        const CHUNK_SIZE: usize = 500;
        let ids: Vec<i64> = workouts.iter().map(|w| w.id).collect();
        let mut by_workout: HashMap<i64, Vec<WorkoutSet>> = HashMap::new();

        for chunk in ids.chunks(CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let sql = format!(
                r#"
                SELECT ws.id, ws.workout_id, ws.exercise_id, ws.set_number, ws.reps, ws.weight,
                       e.id AS e_id, e.name AS e_name, e.category AS e_category,
                       e.created_at AS e_created_at, e.updated_at AS e_updated_at
                FROM workout_sets ws
                LEFT JOIN exercises e ON e.id = ws.exercise_id
                WHERE ws.workout_id IN ({})
                ORDER BY ws.workout_id ASC, ws.set_number ASC, ws.id ASC
                "#,
                placeholders
            );

            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(id);
            }

            for row in query.fetch_all(&self.pool).await? {
                let id: i64 = row.get("id");
                let set = WorkoutSet {
                    id,
                    workout_id: row.get("workout_id"),
                    exercise_id: row.get("exercise_id"),
                    set_number: row.get("set_number"),
                    reps: row.get("reps"),
                    weight: parse_weight(&row, "workout_sets", id),
                    exercise: row
                        .get::<Option<i64>, _>("e_id")
                        .map(|_| exercise_from_row(&row, "e_")),
                };
                by_workout.entry(set.workout_id).or_default().push(set);
            }
        }

        for workout in workouts.iter_mut() {
            workout.sets = by_workout.remove(&workout.id).unwrap_or_default();
        }
        Ok(())
    }
}

fn exercise_from_row(row: &SqliteRow, prefix: &str) -> Exercise {
    let col = |name: &str| format!("{}{}", prefix, name);
    Exercise {
        id: row.get(col("id").as_str()),
        name: row.get(col("name").as_str()),
        category: row.get(col("category").as_str()),
        created_at: TimeMs::new(row.get(col("created_at").as_str())).to_datetime(),
        updated_at: TimeMs::new(row.get(col("updated_at").as_str())).to_datetime(),
    }
}

fn workout_from_row(row: &SqliteRow) -> Workout {
    Workout {
        id: row.get("id"),
        player_id: row.get("player_id"),
        date: TimeMs::new(row.get("date")).to_datetime(),
        notes: row.get("notes"),
        created_at: TimeMs::new(row.get("created_at")).to_datetime(),
        updated_at: TimeMs::new(row.get("updated_at")).to_datetime(),
        sets: Vec::new(),
    }
}
