use super::{player_from_row, Repository};
use crate::db::RepoError;
use crate::domain::{Decimal, Lift, LiftHistory, NewLift, Player, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{info, warn};

const LIFT_SELECT: &str = r#"
    SELECT l.id, l.player_id, l.exercise_name, l.weight, l.reps, l.sets, l.notes,
           l.created_at, l.updated_at,
           p.id AS p_id, p.email AS p_email, p.first_name AS p_first_name,
           p.last_name AS p_last_name, p.position AS p_position,
           p.photo_url AS p_photo_url, p.created_at AS p_created_at,
           p.updated_at AS p_updated_at
    FROM lifts l
    LEFT JOIN players p ON p.id = l.player_id
"#;

impl Repository {
    /// Insert a lift and its history row in one transaction.
    ///
    /// # Errors
    /// `MissingPlayer` if `lift.player_id` does not exist.
    pub async fn insert_lift(&self, lift: &NewLift) -> Result<Lift, RepoError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT 1 FROM players WHERE id = ?")
            .bind(lift.player_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(RepoError::MissingPlayer(lift.player_id));
        }

        let now = TimeMs::now();
        let weight = lift.weight.round_dp(2).to_canonical_string();
        let exercise_name = lift.exercise_name.trim();

        let result = sqlx::query(
            r#"
            INSERT INTO lifts (player_id, exercise_name, weight, reps, sets, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(lift.player_id)
        .bind(exercise_name)
        .bind(&weight)
        .bind(lift.reps)
        .bind(lift.sets)
        .bind(lift.notes.as_deref())
        .bind(now.as_i64())
        .bind(now.as_i64())
        .execute(&mut *tx)
        .await?;
        let lift_id = result.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO lift_history (player_id, exercise_name, weight, reps, sets, notes, workout_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(lift.player_id)
        .bind(exercise_name)
        .bind(&weight)
        .bind(lift.reps)
        .bind(lift.sets)
        .bind(lift.notes.as_deref())
        .bind(now.as_i64())
        .bind(now.as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(lift_id, player_id = lift.player_id, "Lift logged");

        let (lift, _) = self
            .get_lift(lift_id)
            .await?
            .ok_or(RepoError::MissingPlayer(lift.player_id))?;
        Ok(lift)
    }

    /// All lifts with their players, newest first.
    pub async fn list_lifts(&self) -> Result<Vec<(Lift, Option<Player>)>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY l.created_at DESC, l.id DESC",
            LIFT_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(lift_with_player).collect())
    }

    /// One player's lifts, newest first.
    pub async fn lifts_for_player(
        &self,
        player_id: i64,
    ) -> Result<Vec<(Lift, Option<Player>)>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{} WHERE l.player_id = ? ORDER BY l.created_at DESC, l.id DESC",
            LIFT_SELECT
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(lift_with_player).collect())
    }

    pub async fn get_lift(&self, id: i64) -> Result<Option<(Lift, Option<Player>)>, sqlx::Error> {
        let row = sqlx::query(&format!("{} WHERE l.id = ?", LIFT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(lift_with_player))
    }

    /// One player's lift history, most recent workout date first.
    pub async fn lift_history_for_player(
        &self,
        player_id: i64,
    ) -> Result<Vec<LiftHistory>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, player_id, exercise_name, weight, reps, sets, notes, workout_date, created_at
            FROM lift_history
            WHERE player_id = ?
            ORDER BY workout_date DESC, id DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                LiftHistory {
                    id,
                    player_id: row.get("player_id"),
                    exercise_name: row.get("exercise_name"),
                    weight: parse_weight(row, "lift_history", id),
                    reps: row.get("reps"),
                    sets: row.get("sets"),
                    notes: row.get("notes"),
                    workout_date: TimeMs::new(row.get("workout_date")).to_datetime(),
                    created_at: TimeMs::new(row.get("created_at")).to_datetime(),
                }
            })
            .collect())
    }
}

fn lift_with_player(row: &SqliteRow) -> (Lift, Option<Player>) {
    let id: i64 = row.get("id");
    let lift = Lift {
        id,
        player_id: row.get("player_id"),
        exercise_name: row.get("exercise_name"),
        weight: parse_weight(row, "lifts", id),
        reps: row.get("reps"),
        sets: row.get("sets"),
        notes: row.get("notes"),
        created_at: TimeMs::new(row.get("created_at")).to_datetime(),
        updated_at: TimeMs::new(row.get("updated_at")).to_datetime(),
    };
    let player = row
        .get::<Option<i64>, _>("p_id")
        .map(|_| player_from_row(row, "p_"));
    (lift, player)
}

pub(super) fn parse_weight(row: &SqliteRow, table: &str, id: i64) -> Decimal {
    let raw: String = row.get("weight");
    raw.parse::<Decimal>().unwrap_or_else(|e| {
        warn!(
            table,
            id,
            weight = %raw,
            error = %e,
            "Failed to parse stored weight, using zero"
        );
        Decimal::zero()
    })
}

#[cfg(test)]
mod tests {
    use crate::db::{init_db, RepoError, Repository};
    use crate::domain::{Decimal, NewLift, PlayerInput};
    use std::str::FromStr;
    use tempfile::TempDir;

    async fn repo_with_player() -> (Repository, i64, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let repo = Repository::new(init_db(&db_path).await.unwrap());
        let player = repo
            .insert_player(&PlayerInput {
                id: None,
                email: "lifter@tide.edu".to_string(),
                first_name: "Sam".to_string(),
                last_name: "Cole".to_string(),
                position: "C".to_string(),
                photo_url: None,
            })
            .await
            .unwrap();
        (repo, player.id, temp_dir)
    }

    fn lift(player_id: i64, name: &str, weight: &str) -> NewLift {
        NewLift {
            player_id,
            exercise_name: name.to_string(),
            weight: Decimal::from_str(weight).unwrap(),
            reps: 5,
            sets: 3,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_insert_lift_writes_history() {
        let (repo, player_id, _temp) = repo_with_player().await;
        let created = repo
            .insert_lift(&lift(player_id, "Bench Press", "185.255"))
            .await
            .unwrap();
        assert_eq!(created.weight.to_canonical_string(), "185.26");

        let history = repo.lift_history_for_player(player_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].exercise_name, "Bench Press");
        assert_eq!(history[0].weight, created.weight);
    }

    #[tokio::test]
    async fn test_insert_lift_unknown_player() {
        let (repo, _player_id, _temp) = repo_with_player().await;
        let err = repo.insert_lift(&lift(999, "Squat", "200")).await.unwrap_err();
        assert!(matches!(err, RepoError::MissingPlayer(999)));
        assert!(repo.list_lifts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lifts_joined_with_player_and_cascade() {
        let (repo, player_id, _temp) = repo_with_player().await;
        repo.insert_lift(&lift(player_id, "Squat", "225")).await.unwrap();
        repo.insert_lift(&lift(player_id, "Deadlift", "315")).await.unwrap();

        let lifts = repo.lifts_for_player(player_id).await.unwrap();
        assert_eq!(lifts.len(), 2);
        // Newest first; ids break same-millisecond ties.
        assert_eq!(lifts[0].0.exercise_name, "Deadlift");
        assert_eq!(lifts[0].1.as_ref().unwrap().first_name, "Sam");

        repo.delete_player(player_id).await.unwrap();
        assert!(repo.list_lifts().await.unwrap().is_empty());
        assert!(repo
            .lift_history_for_player(player_id)
            .await
            .unwrap()
            .is_empty());
    }
}
