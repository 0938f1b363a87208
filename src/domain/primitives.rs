//! Domain primitives: TimeMs, GameType, ShotCategory.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time in milliseconds since Unix epoch. This is how timestamps are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    pub fn now() -> Self {
        TimeMs(Utc::now().timestamp_millis())
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime. Out-of-range values clamp to the epoch.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.0)
            .single()
            .unwrap_or_default()
    }
}

impl From<DateTime<Utc>> for TimeMs {
    fn from(value: DateTime<Utc>) -> Self {
        TimeMs(value.timestamp_millis())
    }
}

/// Kind of session a stat line was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Practice,
    Scrimmage,
    Game,
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameType::Practice => write!(f, "practice"),
            GameType::Scrimmage => write!(f, "scrimmage"),
            GameType::Game => write!(f, "game"),
        }
    }
}

/// Shooting category tracked on a stat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShotCategory {
    ThreePoint,
    TwoPoint,
    FreeThrow,
}

impl ShotCategory {
    /// Points scored per make.
    pub fn points(&self) -> u32 {
        match self {
            ShotCategory::ThreePoint => 3,
            ShotCategory::TwoPoint => 2,
            ShotCategory::FreeThrow => 1,
        }
    }
}

impl FromStr for ShotCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threepoint" | "three" => Ok(ShotCategory::ThreePoint),
            "twopoint" | "two" => Ok(ShotCategory::TwoPoint),
            "freethrow" | "ft" => Ok(ShotCategory::FreeThrow),
            _ => Err(()),
        }
    }
}
