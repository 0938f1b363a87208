use crate::domain::{RosterPlayer, ShotCategory, StatEntry};
use crate::engine::shooting::{shot_totals, ShotTotals};
use serde::Serialize;
use std::str::FromStr;

/// Rows shown on the dashboard's top-shooters card.
pub const DASHBOARD_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardMetric {
    /// 3 per three, 2 per two, 1 per free throw.
    #[default]
    TotalPoints,
    Threes,
    Twos,
    FreeThrows,
}

impl FromStr for LeaderboardMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "totalPoints" => Ok(LeaderboardMetric::TotalPoints),
            "threes" => Ok(LeaderboardMetric::Threes),
            "twos" => Ok(LeaderboardMetric::Twos),
            "freeThrows" => Ok(LeaderboardMetric::FreeThrows),
            other => Err(format!("unknown leaderboard metric: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub player_id: String,
    pub name: String,
    pub position: String,
    pub three: ShotTotals,
    pub two: ShotTotals,
    pub free_throw: ShotTotals,
    pub total_points: u32,
}

impl LeaderboardRow {
    fn score(&self, metric: LeaderboardMetric) -> u32 {
        match metric {
            LeaderboardMetric::TotalPoints => self.total_points,
            LeaderboardMetric::Threes => self.three.makes,
            LeaderboardMetric::Twos => self.two.makes,
            LeaderboardMetric::FreeThrows => self.free_throw.makes,
        }
    }

    fn total_makes(&self) -> u32 {
        self.three
            .makes
            .saturating_add(self.two.makes)
            .saturating_add(self.free_throw.makes)
    }
}

/// Rank players by `metric`, best first, keeping roster order for ties.
///
/// Returns an empty board when none of the top `limit` players has made a
/// shot.
pub fn leaderboard(
    players: &[RosterPlayer],
    entries: &[StatEntry],
    metric: LeaderboardMetric,
    limit: usize,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = players
        .iter()
        .map(|player| {
            let own = || entries.iter().filter(|e| e.player_id == player.id);
            let three = shot_totals(own(), ShotCategory::ThreePoint);
            let two = shot_totals(own(), ShotCategory::TwoPoint);
            let free_throw = shot_totals(own(), ShotCategory::FreeThrow);
            let total_points = [
                (three.makes, ShotCategory::ThreePoint),
                (two.makes, ShotCategory::TwoPoint),
                (free_throw.makes, ShotCategory::FreeThrow),
            ]
            .iter()
            .fold(0u32, |acc, (makes, category)| {
                acc.saturating_add(makes.saturating_mul(category.points()))
            });
            LeaderboardRow {
                player_id: player.id.clone(),
                name: player.name.clone(),
                position: player.position.clone(),
                three,
                two,
                free_throw,
                total_points,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.score(metric).cmp(&a.score(metric)));
    rows.truncate(limit);

    if rows.iter().all(|r| r.total_makes() == 0) {
        return Vec::new();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GameType;

    fn player(id: &str, name: &str) -> RosterPlayer {
        RosterPlayer {
            id: id.to_string(),
            name: name.to_string(),
            position: "G".to_string(),
            photo: None,
        }
    }

    fn entry(player_id: &str, threes: u32, twos: u32, fts: u32) -> StatEntry {
        StatEntry {
            id: 0,
            player_id: player_id.to_string(),
            date: "2025-02-01".to_string(),
            game_type: GameType::Game,
            three_point_makes: threes,
            three_point_attempts: threes + 1,
            two_point_makes: twos,
            two_point_attempts: twos + 1,
            free_throw_makes: fts,
            free_throw_attempts: fts,
            assists: 0,
            rebounds: 0,
            timestamp: "2025-02-01T18:00:00Z".to_string(),
        }
    }

    #[test]
    fn total_points_weighs_threes() {
        let players = vec![player("a", "Two Guy"), player("b", "Three Guy")];
        let entries = vec![entry("a", 0, 1, 0), entry("b", 2, 0, 0)];
        let board = leaderboard(&players, &entries, LeaderboardMetric::TotalPoints, 5);
        assert_eq!(board[0].player_id, "b");
        assert_eq!(board[0].total_points, 6);
        assert_eq!(board[1].total_points, 2);
    }

    #[test]
    fn raw_makes_metric_and_stable_ties() {
        let players = vec![player("a", "A"), player("b", "B"), player("c", "C")];
        let entries = vec![entry("a", 1, 0, 4), entry("b", 1, 0, 4), entry("c", 0, 0, 5)];
        let board = leaderboard(&players, &entries, LeaderboardMetric::FreeThrows, 5);
        let order: Vec<&str> = board.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn limit_truncates() {
        let players: Vec<RosterPlayer> = (0..8).map(|i| player(&i.to_string(), "P")).collect();
        let entries: Vec<StatEntry> = (0..8).map(|i| entry(&i.to_string(), i, 0, 0)).collect();
        let board = leaderboard(&players, &entries, LeaderboardMetric::Threes, DASHBOARD_LIMIT);
        assert_eq!(board.len(), 5);
        assert_eq!(board[0].three.makes, 7);
    }

    #[test]
    fn empty_when_nobody_scored() {
        let players = vec![player("a", "A")];
        let entries = vec![entry("a", 0, 0, 0)];
        assert!(leaderboard(&players, &entries, LeaderboardMetric::TotalPoints, 5).is_empty());
        assert!(leaderboard(&[], &[], LeaderboardMetric::TotalPoints, 5).is_empty());
    }

    #[test]
    fn huge_counts_saturate() {
        let mut big = entry("a", 0, 0, 0);
        big.three_point_makes = u32::MAX;
        big.three_point_attempts = u32::MAX;
        big.free_throw_makes = u32::MAX;
        big.free_throw_attempts = u32::MAX;
        let board = leaderboard(&[player("a", "A")], &[big], LeaderboardMetric::TotalPoints, 5);
        assert_eq!(board[0].total_points, u32::MAX);
        assert_eq!(board[0].total_makes(), u32::MAX);
    }

    #[test]
    fn metric_parses_dashboard_values() {
        assert_eq!("threes".parse(), Ok(LeaderboardMetric::Threes));
        assert_eq!("freeThrows".parse(), Ok(LeaderboardMetric::FreeThrows));
        assert!("dunks".parse::<LeaderboardMetric>().is_err());
    }
}
