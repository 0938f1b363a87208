//! Exercises, lifting workouts and their sets.

use crate::domain::validation::Violations;
use crate::domain::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Library exercise referenced by workout sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/Exercise`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewExercise {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    /// # Errors
    /// Returns every violated constraint.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut v = Violations::new();
        v.required("Name", &self.name, 100);
        v.optional_max_len("Category", self.category.as_deref(), 50);
        v.into_result()
    }
}

/// One set inside a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub set_number: i64,
    pub reps: i64,
    pub weight: Decimal,
    #[serde(default)]
    pub exercise: Option<Exercise>,
}

/// A lifting session with its sets ordered by `set_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub player_id: i64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkoutSet {
    pub exercise_id: i64,
    #[serde(default = "default_set_number")]
    pub set_number: i64,
    pub reps: i64,
    pub weight: Decimal,
}

fn default_set_number() -> i64 {
    1
}

/// Body of `POST /api/Workout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    pub player_id: i64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<NewWorkoutSet>,
}

impl NewWorkout {
    /// # Errors
    /// Returns every violated constraint, prefixed with the set index.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut v = Violations::new();
        v.optional_max_len("Notes", self.notes.as_deref(), 200);
        if self.sets.is_empty() {
            v.push("Sets must contain at least one set");
        }
        for (idx, set) in self.sets.iter().enumerate() {
            let prefix = format!("Sets[{}]", idx);
            v.count(&format!("{}.SetNumber", prefix), set.set_number, 1);
            v.count(&format!("{}.Reps", prefix), set.reps, 1);
            v.weight(&format!("{}.Weight", prefix), set.weight);
        }
        v.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(reps: i64, weight: i64) -> NewWorkoutSet {
        NewWorkoutSet {
            exercise_id: 1,
            set_number: 1,
            reps,
            weight: Decimal::from(weight),
        }
    }

    #[test]
    fn workout_requires_a_set() {
        let w = NewWorkout {
            player_id: 1,
            date: Utc::now(),
            notes: None,
            sets: vec![],
        };
        assert_eq!(
            w.validate().unwrap_err(),
            vec!["Sets must contain at least one set".to_string()]
        );
    }

    #[test]
    fn set_violations_are_indexed() {
        let w = NewWorkout {
            player_id: 1,
            date: Utc::now(),
            notes: Some("x".repeat(201)),
            sets: vec![set(8, 135), set(0, -10)],
        };
        let errors = w.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&"Sets[1].Reps must be at least 1".to_string()));
        assert!(errors.contains(&"Sets[1].Weight must be a positive number".to_string()));
    }

    #[test]
    fn oversized_set_is_rejected() {
        let w = NewWorkout {
            player_id: 1,
            date: Utc::now(),
            notes: None,
            sets: vec![set(i64::MAX, 1_000_000_000)],
        };
        let errors = w.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Sets[0].Reps must be at most 2147483647".to_string(),
                "Sets[0].Weight must be at most 99999999.99".to_string(),
            ]
        );
    }

    #[test]
    fn exercise_name_required_and_category_blank_dropped() {
        let e = NewExercise {
            name: "  ".to_string(),
            category: Some(" ".to_string()),
        }
        .normalized();
        assert!(e.category.is_none());
        assert_eq!(e.validate().unwrap_err(), vec!["Name is required".to_string()]);
    }
}
