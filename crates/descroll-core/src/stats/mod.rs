//! Daily statistics: canonical doom score, day aggregation, and streaks.

mod daily;
mod streak;

pub use daily::{compute_daily_score, DailyStat, MAX_DOOM_SCORE, SCORE_TIME_BRACKETS};
pub use streak::{compute_streak, StreakSummary, STREAK_SCORE_GATE};
