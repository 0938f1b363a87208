//! Pure aggregation over stat entries, sessions, lifts and workouts.
//!
//! Nothing here touches the network or the store. Callers pass in whatever
//! slice of records they have loaded (and "today" where a window matters)
//! and get typed summaries back for rendering.

pub mod dashboard;
pub mod leaderboard;
pub mod lifting;
pub mod shooting;
pub mod trend;

pub use dashboard::{
    compare_players, dashboard_summary, sessions_per_day, team_overview, CountingStat,
    DashboardSummary, DaySessions, PlayerComparison, PlayerSelection, TeamOverview,
};
pub use leaderboard::{leaderboard, LeaderboardMetric, LeaderboardRow, DASHBOARD_LIMIT};
pub use lifting::{
    lift_summary, lifting_progress, lifting_quick_stats, most_active_player, recent_lifts,
    LiftSummary, LiftingQuickStats, ProgressSeries,
};
pub use shooting::{calculate_percentage, shot_totals, ShotTotals};
pub use trend::{trend, Trend};
