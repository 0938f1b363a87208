use crate::domain::{ShotCategory, StatEntry};
use crate::engine::shooting::shot_totals;
use serde::Serialize;

const WINDOW: usize = 3;
const THRESHOLD: i64 = 5;

/// Direction of a player's shooting over their most recent entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    /// Fewer than two entries.
    NoData,
    /// Enough entries for a recent window but nothing older to compare with.
    InsufficientData,
    Improving,
    Declining,
    Stable,
}

/// Compare the pooled percentage of the newest three entries against the
/// three before them. `entries` must be ordered newest first.
pub fn trend(entries: &[StatEntry], category: ShotCategory) -> Trend {
    if entries.len() < 2 {
        return Trend::NoData;
    }

    let recent = &entries[..WINDOW.min(entries.len())];
    let older = entries.get(WINDOW..(2 * WINDOW).min(entries.len())).unwrap_or(&[]);
    if older.is_empty() {
        return Trend::InsufficientData;
    }

    let recent_pct = i64::from(shot_totals(recent, category).percentage);
    let older_pct = i64::from(shot_totals(older, category).percentage);
    let diff = recent_pct - older_pct;

    if diff > THRESHOLD {
        Trend::Improving
    } else if diff < -THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
