//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `mod.rs` - Player operations
//! - `lifts.rs` - Lift and lift history operations
//! - `workouts.rs` - Exercise and workout operations

mod lifts;
mod workouts;

pub use workouts::WorkoutFilter;

use crate::db::{is_unique_violation, RepoError};
use crate::domain::{Player, PlayerInput, TimeMs};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::info;

const PLAYER_COLUMNS: &str =
    "id, email, first_name, last_name, position, photo_url, created_at, updated_at";

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Round-trip a trivial query; used by `/ready`.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Player operations
    // =========================================================================

    /// All players, oldest first.
    pub async fn list_players(&self) -> Result<Vec<Player>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM players ORDER BY id ASC",
            PLAYER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| player_from_row(row, "")).collect())
    }

    pub async fn get_player(&self, id: i64) -> Result<Option<Player>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM players WHERE id = ?",
            PLAYER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| player_from_row(&r, "")))
    }

    /// Look a player up by email, ignoring case.
    pub async fn get_player_by_email(&self, email: &str) -> Result<Option<Player>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM players WHERE email = ? COLLATE NOCASE",
            PLAYER_COLUMNS
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| player_from_row(&r, "")))
    }

    /// Insert a player.
    ///
    /// # Errors
    /// `DuplicateEmail` if the email is already registered.
    pub async fn insert_player(&self, input: &PlayerInput) -> Result<Player, RepoError> {
        let now = TimeMs::now();
        let result = sqlx::query(
            r#"
            INSERT INTO players (email, first_name, last_name, position, photo_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.position)
        .bind(input.photo_url.as_deref())
        .bind(now.as_i64())
        .bind(now.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, &input.email))?;

        let id = result.last_insert_rowid();
        info!(player_id = id, "Player created");

        self.get_player(id)
            .await?
            .ok_or(RepoError::MissingPlayer(id))
    }

    /// Overwrite a player's editable fields.
    ///
    /// Returns `None` if no player has this id.
    pub async fn update_player(
        &self,
        id: i64,
        input: &PlayerInput,
    ) -> Result<Option<Player>, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE players
            SET email = ?, first_name = ?, last_name = ?, position = ?, photo_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.position)
        .bind(input.photo_url.as_deref())
        .bind(TimeMs::now().as_i64())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, &input.email))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(self.get_player(id).await?)
    }

    /// Delete a player. Lifts, lift history and workouts go with it.
    ///
    /// Returns false if no player has this id.
    pub async fn delete_player(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(player_id = id, "Player deleted with dependents");
        }
        Ok(deleted)
    }

    pub async fn player_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

fn map_email_conflict(err: sqlx::Error, email: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateEmail(email.to_string())
    } else {
        RepoError::Db(err)
    }
}

/// Map player columns, optionally aliased with `prefix` (e.g. `p_id`).
fn player_from_row(row: &SqliteRow, prefix: &str) -> Player {
    let col = |name: &str| format!("{}{}", prefix, name);
    Player {
        id: row.get(col("id").as_str()),
        email: row.get(col("email").as_str()),
        first_name: row.get(col("first_name").as_str()),
        last_name: row.get(col("last_name").as_str()),
        position: row.get(col("position").as_str()),
        photo_url: row.get(col("photo_url").as_str()),
        created_at: TimeMs::new(row.get(col("created_at").as_str())).to_datetime(),
        updated_at: TimeMs::new(row.get(col("updated_at").as_str())).to_datetime(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn temp_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn input(email: &str) -> PlayerInput {
        PlayerInput {
            id: None,
            email: email.to_string(),
            first_name: "Jordan".to_string(),
            last_name: "Reed".to_string(),
            position: "PG".to_string(),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_by_email() {
        let (repo, _temp) = temp_repo().await;
        let created = repo.insert_player(&input("jordan@tide.edu")).await.unwrap();
        assert_eq!(created.full_name(), "Jordan Reed");

        let found = repo
            .get_player_by_email("JORDAN@tide.edu")
            .await
            .unwrap()
            .expect("player not found");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (repo, _temp) = temp_repo().await;
        repo.insert_player(&input("dup@tide.edu")).await.unwrap();
        let err = repo.insert_player(&input("Dup@tide.edu")).await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_update_missing_player_returns_none() {
        let (repo, _temp) = temp_repo().await;
        let updated = repo.update_player(42, &input("x@y.z")).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, _temp) = temp_repo().await;
        let created = repo.insert_player(&input("a@tide.edu")).await.unwrap();

        let mut edit = input("a@tide.edu");
        edit.position = "SF".to_string();
        let updated = repo
            .update_player(created.id, &edit)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.position, "SF");
        assert!(updated.updated_at >= created.updated_at);

        assert!(repo.delete_player(created.id).await.unwrap());
        assert!(!repo.delete_player(created.id).await.unwrap());
        assert!(!repo.player_exists(created.id).await.unwrap());
    }
}
