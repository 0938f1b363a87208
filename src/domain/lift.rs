//! Single-exercise lift log and its history mirror.

use crate::domain::validation::Violations;
use crate::domain::{Decimal, Player};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};

/// Exercise names offered by `GET /api/Lift/exercises`.
pub const DEFAULT_EXERCISES: [&str; 6] = [
    "Bench Press",
    "Squat",
    "Deadlift",
    "Row",
    "Curl",
    "Pull Ups",
];

/// A stored lift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lift {
    pub id: i64,
    pub player_id: i64,
    pub exercise_name: String,
    pub weight: Decimal,
    pub reps: i64,
    pub sets: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lift {
    /// Epley estimate: `weight * (1 + reps / 30)`.
    pub fn estimated_one_rep_max(&self) -> Decimal {
        estimated_one_rep_max(self.weight, self.reps)
    }
}

pub fn estimated_one_rep_max(weight: Decimal, reps: i64) -> Decimal {
    let factor = RustDecimal::ONE + RustDecimal::from(reps) / RustDecimal::from(30);
    (weight * Decimal::new(factor)).round_dp(2)
}

/// Lift as returned by the API: derived 1RM plus the owning player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftView {
    #[serde(flatten)]
    pub lift: Lift,
    pub estimated_one_rep_max: Decimal,
    pub player: Option<Player>,
}

impl LiftView {
    pub fn new(lift: Lift, player: Option<Player>) -> Self {
        let estimated_one_rep_max = lift.estimated_one_rep_max();
        Self {
            lift,
            estimated_one_rep_max,
            player,
        }
    }
}

/// Body of `POST /api/Lift`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLift {
    pub player_id: i64,
    #[serde(default)]
    pub exercise_name: String,
    pub weight: Decimal,
    pub reps: i64,
    #[serde(default = "default_sets")]
    pub sets: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_sets() -> i64 {
    1
}

impl NewLift {
    /// # Errors
    /// Returns every violated constraint.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut v = Violations::new();
        v.required("ExerciseName", &self.exercise_name, 50);
        v.weight("Weight", self.weight);
        v.count("Reps", self.reps, 1);
        v.count("Sets", self.sets, 1);
        v.optional_max_len("Notes", self.notes.as_deref(), 500);
        v.into_result()
    }
}

/// Append-only record written alongside every created lift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftHistory {
    pub id: i64,
    pub player_id: i64,
    pub exercise_name: String,
    pub weight: Decimal,
    pub reps: i64,
    pub sets: i64,
    pub notes: Option<String>,
    pub workout_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
