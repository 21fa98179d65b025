//! Streak computation over persisted daily stats.
//!
//! A day qualifies when a stat exists for it and its doom score passes the
//! gate. The walk runs backward from today and stops at the first missing or
//! failing day -- a day with no recorded data breaks the streak, it is not
//! skipped.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::daily::DailyStat;

/// Highest doom score that still counts as a successful day.
pub const STREAK_SCORE_GATE: u8 = 4;

/// Current and longest streak, as of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive qualifying days ending at (and including) today.
    pub current: u32,
    /// Monotonic maximum over the whole history.
    pub longest: u32,
}

/// Walk calendar days backward from `today` over `history`.
///
/// `history` may be in any order and may contain at most one stat per day;
/// when duplicates exist the last one wins. The returned `longest` never
/// falls below any stored `longest_streak`.
pub fn compute_streak(today: NaiveDate, history: &[DailyStat]) -> StreakSummary {
    let scores: HashMap<NaiveDate, u8> = history
        .iter()
        .map(|stat| (stat.date, stat.doom_score))
        .collect();

    let mut current = 0u32;
    let mut day = today;
    loop {
        match scores.get(&day) {
            Some(&score) if score <= STREAK_SCORE_GATE => {
                current += 1;
                match day.pred_opt() {
                    Some(prev) => day = prev,
                    None => break, // start of the calendar
                }
            }
            _ => break,
        }
    }

    let stored_longest = history
        .iter()
        .map(|stat| stat.longest_streak)
        .max()
        .unwrap_or(0);

    StreakSummary {
        current,
        longest: stored_longest.max(current),
    }
}
