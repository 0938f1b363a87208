//! Dashboard cards: per-player or team summary, team overview, head-to-head
//! comparison and the sessions-per-day strip.

use crate::domain::{Decimal, RosterPlayer, SessionLog, ShotCategory, StatEntry};
use crate::engine::shooting::{calculate_percentage, shot_totals, ShotTotals};
use crate::engine::trend::{trend, Trend};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Whose numbers the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSelection {
    /// Empty roster or nothing picked yet.
    Unselected,
    All,
    Player(String),
}

impl PlayerSelection {
    fn includes(&self, player_id: &str) -> bool {
        match self {
            PlayerSelection::Unselected => false,
            PlayerSelection::All => true,
            PlayerSelection::Player(id) => id == player_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sessions: usize,
    pub sessions_this_week: usize,
    pub three_point: ShotTotals,
    pub free_throw: ShotTotals,
    pub three_point_trend: Trend,
    pub free_throw_trend: Trend,
}

impl DashboardSummary {
    fn empty() -> Self {
        Self {
            total_sessions: 0,
            sessions_this_week: 0,
            three_point: ShotTotals::default(),
            free_throw: ShotTotals::default(),
            three_point_trend: Trend::NoData,
            free_throw_trend: Trend::NoData,
        }
    }
}

/// `entries` are expected newest first, the order the client stores them in.
/// Sessions dated within seven days of `today` (inclusive) count as this week.
pub fn dashboard_summary(
    sessions: &[SessionLog],
    entries: &[StatEntry],
    selection: &PlayerSelection,
    today: NaiveDate,
) -> DashboardSummary {
    if *selection == PlayerSelection::Unselected {
        return DashboardSummary::empty();
    }

    let own_sessions: Vec<&SessionLog> = sessions
        .iter()
        .filter(|s| selection.includes(&s.player_id))
        .collect();
    let own_entries: Vec<StatEntry> = entries
        .iter()
        .filter(|e| selection.includes(&e.player_id))
        .cloned()
        .collect();

    let week_start = today - Duration::days(7);
    let sessions_this_week = own_sessions
        .iter()
        .filter(|s| parse_day(&s.date).is_some_and(|d| d >= week_start))
        .count();

    DashboardSummary {
        total_sessions: own_sessions.len(),
        sessions_this_week,
        three_point: shot_totals(&own_entries, ShotCategory::ThreePoint),
        free_throw: shot_totals(&own_entries, ShotCategory::FreeThrow),
        three_point_trend: trend(&own_entries, ShotCategory::ThreePoint),
        free_throw_trend: trend(&own_entries, ShotCategory::FreeThrow),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    pub player_count: usize,
    pub session_count: usize,
    pub three_point_percentage: u32,
    pub free_throw_percentage: u32,
}

pub fn team_overview(
    players: &[RosterPlayer],
    sessions: &[SessionLog],
    entries: &[StatEntry],
) -> TeamOverview {
    let three = shot_totals(entries, ShotCategory::ThreePoint);
    let ft = shot_totals(entries, ShotCategory::FreeThrow);
    TeamOverview {
        player_count: players.len(),
        session_count: sessions.len(),
        three_point_percentage: calculate_percentage(three.makes, three.attempts),
        free_throw_percentage: calculate_percentage(ft.makes, ft.attempts),
    }
}

/// Running total plus per-entry average (one decimal place).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountingStat {
    pub total: u32,
    pub average: Decimal,
}

impl CountingStat {
    fn new(total: u32, games: usize) -> Self {
        let average = if games == 0 {
            Decimal::zero()
        } else {
            (Decimal::from(i64::from(total)) / Decimal::from(games as i64)).round_dp(1)
        };
        Self { total, average }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerComparison {
    pub player_id: String,
    pub three_point: ShotTotals,
    pub two_point: ShotTotals,
    pub free_throw: ShotTotals,
    pub assists: CountingStat,
    pub rebounds: CountingStat,
    pub games_played: usize,
}

fn comparison_for(entries: &[StatEntry], player_id: &str) -> PlayerComparison {
    let own: Vec<&StatEntry> = entries.iter().filter(|e| e.player_id == player_id).collect();
    let games = own.len();
    let assists = own.iter().fold(0u32, |acc, e| acc.saturating_add(e.assists));
    let rebounds = own.iter().fold(0u32, |acc, e| acc.saturating_add(e.rebounds));

    PlayerComparison {
        player_id: player_id.to_string(),
        three_point: shot_totals(own.iter().copied(), ShotCategory::ThreePoint),
        two_point: shot_totals(own.iter().copied(), ShotCategory::TwoPoint),
        free_throw: shot_totals(own.iter().copied(), ShotCategory::FreeThrow),
        assists: CountingStat::new(assists, games),
        rebounds: CountingStat::new(rebounds, games),
        games_played: games,
    }
}

/// Side-by-side numbers for two different players. `None` if `a == b`.
pub fn compare_players(
    entries: &[StatEntry],
    a: &str,
    b: &str,
) -> Option<(PlayerComparison, PlayerComparison)> {
    if a == b {
        return None;
    }
    Some((comparison_for(entries, a), comparison_for(entries, b)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySessions {
    pub date: NaiveDate,
    pub count: usize,
}

/// Session counts for the seven days ending at `today`, oldest first.
pub fn sessions_per_day(sessions: &[SessionLog], today: NaiveDate) -> Vec<DaySessions> {
    (0..7i64)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let count = sessions
                .iter()
                .filter(|s| parse_day(&s.date) == Some(date))
                .count();
            DaySessions { date, count }
        })
        .collect()
}

/// Session dates are `YYYY-MM-DD`; a full timestamp is cut to its date part.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
