//! Lifting cards: quick stats and progress for set-based workouts, and the
//! summary/coach view over single-exercise lifts.

use crate::domain::{Decimal, LiftView, Workout, WorkoutSet};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftingQuickStats {
    pub workout_count: usize,
    /// Σ reps × weight over every set, rounded.
    pub total_volume: i64,
    /// Mean set weight, rounded.
    pub average_weight: i64,
    pub exercise_count: usize,
}

pub fn lifting_quick_stats(workouts: &[Workout]) -> LiftingQuickStats {
    let sets: Vec<&WorkoutSet> = workouts.iter().flat_map(|w| w.sets.iter()).collect();

    let total_volume: Decimal = sets
        .iter()
        .map(|s| Decimal::from(s.reps) * s.weight)
        .sum();
    let average_weight = if sets.is_empty() {
        Decimal::zero()
    } else {
        sets.iter().map(|s| s.weight).sum::<Decimal>() / Decimal::from(sets.len() as i64)
    };
    let exercises: HashSet<i64> = sets.iter().map(|s| s.exercise_id).collect();

    LiftingQuickStats {
        workout_count: workouts.len(),
        total_volume: total_volume.round_whole(),
        average_weight: average_weight.round_whole(),
        exercise_count: exercises.len(),
    }
}

/// First and latest weight logged for one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSeries {
    pub exercise: String,
    pub first: Decimal,
    pub last: Decimal,
    /// `last - first`, to one decimal place with halves rounded up.
    pub change: Decimal,
}

/// Per-exercise progress, in the order exercises first appear, capped at
/// `max_series`. Points inside a series are ordered by workout date.
pub fn lifting_progress(workouts: &[Workout], max_series: usize) -> Vec<ProgressSeries> {
    let mut series: Vec<(String, Vec<(DateTime<Utc>, Decimal)>)> = Vec::new();
    for workout in workouts {
        for set in &workout.sets {
            let key = series_key(set);
            let point = (workout.date, set.weight);
            match series.iter_mut().find(|(name, _)| *name == key) {
                Some((_, points)) => points.push(point),
                None => series.push((key, vec![point])),
            }
        }
    }

    series
        .into_iter()
        .take(max_series)
        .filter_map(|(exercise, mut points)| {
            points.sort_by_key(|(date, _)| *date);
            let first = points.first()?.1;
            let last = points.last()?.1;
            Some(ProgressSeries {
                exercise,
                first,
                last,
                change: (last - first).round_half_up_dp(1),
            })
        })
        .collect()
}

fn series_key(set: &WorkoutSet) -> String {
    match &set.exercise {
        Some(exercise) => exercise.name.clone(),
        None => format!("Exercise #{}", set.exercise_id),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftSummary {
    pub total_lifts: usize,
    /// Σ weight × reps × sets, rounded.
    pub total_volume: i64,
    pub active_players: usize,
    /// Lifts created in the seven days before `now`.
    pub lifts_this_week: usize,
    pub exercise_count: usize,
    pub top_exercise: Option<String>,
}

pub fn lift_summary(lifts: &[LiftView], now: DateTime<Utc>) -> LiftSummary {
    let total_volume: Decimal = lifts
        .iter()
        .map(|l| l.lift.weight * Decimal::from(l.lift.reps) * Decimal::from(l.lift.sets))
        .sum();
    let players: HashSet<i64> = lifts.iter().map(|l| l.lift.player_id).collect();
    let week_ago = now - Duration::days(7);

    LiftSummary {
        total_lifts: lifts.len(),
        total_volume: total_volume.round_whole(),
        active_players: players.len(),
        lifts_this_week: lifts.iter().filter(|l| l.lift.created_at > week_ago).count(),
        exercise_count: lifts
            .iter()
            .map(|l| l.lift.exercise_name.as_str())
            .collect::<HashSet<_>>()
            .len(),
        top_exercise: most_frequent(lifts.iter().map(|l| l.lift.exercise_name.clone())),
    }
}

/// Name of the player with the most lifts logged.
pub fn most_active_player(lifts: &[LiftView]) -> Option<String> {
    most_frequent(lifts.iter().map(|l| match &l.player {
        Some(player) => player.full_name(),
        None => format!("Player #{}", l.lift.player_id),
    }))
}

/// The newest `n` lifts. Lifts arrive newest first from the API.
pub fn recent_lifts(lifts: &[LiftView], n: usize) -> &[LiftView] {
    &lifts[..n.min(lifts.len())]
}

/// Most common value; ties go to the one seen first.
fn most_frequent<I: IntoIterator<Item = String>>(values: I) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let best = counts.iter().map(|(_, n)| *n).max()?;
    counts.into_iter().find(|(_, n)| *n == best).map(|(v, _)| v)
}
