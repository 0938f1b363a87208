//! Client-local shooting stat lines and the sessions they were recorded in.
//!
//! These never reach the API; they live in the client's local store. Player
//! ids are strings because players created offline get timestamp ids.

use crate::domain::{GameType, ShotCategory};
use serde::{Deserialize, Serialize};

/// Made/attempted counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotLine {
    pub makes: u32,
    pub attempts: u32,
}

impl ShotLine {
    pub fn new(makes: u32, attempts: u32) -> Self {
        Self { makes, attempts }
    }

    /// Makes may never exceed attempts; excess makes are cut to `attempts`.
    pub fn clamped(self) -> Self {
        Self {
            makes: self.makes.min(self.attempts),
            attempts: self.attempts,
        }
    }
}

/// One player's stat line for a practice, scrimmage or game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatEntry {
    pub id: i64,
    pub player_id: String,
    pub date: String,
    pub game_type: GameType,
    #[serde(default)]
    pub three_point_makes: u32,
    #[serde(default)]
    pub three_point_attempts: u32,
    #[serde(default)]
    pub two_point_makes: u32,
    #[serde(default)]
    pub two_point_attempts: u32,
    #[serde(default)]
    pub free_throw_makes: u32,
    #[serde(default)]
    pub free_throw_attempts: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub rebounds: u32,
    pub timestamp: String,
}

impl StatEntry {
    pub fn shots(&self, category: ShotCategory) -> ShotLine {
        match category {
            ShotCategory::ThreePoint => {
                ShotLine::new(self.three_point_makes, self.three_point_attempts)
            }
            ShotCategory::TwoPoint => ShotLine::new(self.two_point_makes, self.two_point_attempts),
            ShotCategory::FreeThrow => {
                ShotLine::new(self.free_throw_makes, self.free_throw_attempts)
            }
        }
    }

    /// Clamp every category so makes never exceed attempts.
    pub fn clamp_makes(&mut self) {
        self.three_point_makes = self.three_point_makes.min(self.three_point_attempts);
        self.two_point_makes = self.two_point_makes.min(self.two_point_attempts);
        self.free_throw_makes = self.free_throw_makes.min(self.free_throw_attempts);
    }
}

/// Practice or game session logged together with a stat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLog {
    pub id: i64,
    pub player_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(rename = "type")]
    pub session_type: GameType,
    #[serde(default)]
    pub notes: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_line_clamps_makes() {
        assert_eq!(ShotLine::new(7, 5).clamped(), ShotLine::new(5, 5));
        assert_eq!(ShotLine::new(3, 5).clamped(), ShotLine::new(3, 5));
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let entry: StatEntry = serde_json::from_str(
            r#"{"id":1,"playerId":"7","date":"2025-01-10","gameType":"practice",
                "threePointMakes":2,"threePointAttempts":5,"timestamp":"t"}"#,
        )
        .unwrap();
        assert_eq!(entry.shots(ShotCategory::TwoPoint), ShotLine::new(0, 0));
        assert_eq!(entry.shots(ShotCategory::ThreePoint), ShotLine::new(2, 5));
    }

    #[test]
    fn session_type_uses_type_key() {
        let s = SessionLog {
            id: 1,
            player_id: "1".to_string(),
            date: "2025-01-10".to_string(),
            session_type: GameType::Game,
            notes: String::new(),
            timestamp: "t".to_string(),
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "game");
        assert_eq!(json["playerId"], "1");
    }
}
