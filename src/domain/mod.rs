//! Domain types for the team tracker.
//!
//! This module provides:
//! - Exact decimal weights via the Decimal wrapper
//! - Primitives: TimeMs, GameType, ShotCategory
//! - Server entities (players, lifts, exercises, workouts) and their inputs
//! - Client-local stat entries and session logs
//! - Violation collection for request validation

pub mod decimal;
pub mod lift;
pub mod player;
pub mod primitives;
pub mod stat_entry;
pub mod validation;
pub mod workout;

pub use decimal::Decimal;
pub use lift::{Lift, LiftHistory, LiftView, NewLift, DEFAULT_EXERCISES};
pub use player::{Player, PlayerInput, RosterPlayer};
pub use primitives::{GameType, ShotCategory, TimeMs};
pub use stat_entry::{SessionLog, ShotLine, StatEntry};
pub use validation::Violations;
pub use workout::{Exercise, NewExercise, NewWorkout, NewWorkoutSet, Workout, WorkoutSet};
