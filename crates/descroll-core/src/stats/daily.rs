//! Per-day statistics and the canonical doom score.
//!
//! `compute_daily_score` is the persisted 0-10 score the streak gate reads.
//! It aggregates only with commutative/associative operations, so it is
//! idempotent and invariant under reordering of the input sessions.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::detect::{self, DetectionThresholds};
use crate::session::Session;
use crate::timectx;

/// Half-open `(min, max, points)` duration brackets, scanned in ascending
/// order; the first match wins.
pub const SCORE_TIME_BRACKETS: [(i64, i64, u8); 5] = [
    (0, 900, 0),           // < 15 min
    (900, 1800, 1),        // 15-30 min
    (1800, 3600, 2),       // 30-60 min
    (3600, 7200, 3),       // 1-2 hours
    (7200, i64::MAX, 4),   // 2+ hours
];

const MAX_INTERRUPTED_POINTS: u8 = 3;
const MAX_IGNORED_POINTS: u8 = 2;
const LATE_NIGHT_POINTS: u8 = 1;

/// Ceiling for the canonical doom score.
pub const MAX_DOOM_SCORE: u8 = 10;

/// Estimated seconds reclaimed per successful break, half the default
/// detection threshold.
const TIME_SAVED_PER_BREAK_SECS: i64 = 750;

/// Canonical doom score for one day's closed sessions.
pub fn compute_daily_score(sessions: &[Session]) -> u8 {
    let mut score: u8 = 0;

    // Factor 1: total scroll time across the day (0-4 points).
    let total_secs: i64 = sessions.iter().map(|s| s.duration_secs).sum();
    for (min, max, points) in SCORE_TIME_BRACKETS {
        if total_secs >= min && total_secs < max {
            score += points;
            break;
        }
    }

    // Factor 2: interrupted sessions (0-3 points).
    let interrupted = sessions.iter().filter(|s| s.was_interrupted).count();
    score += (interrupted as u8).min(MAX_INTERRUPTED_POINTS);

    // Factor 3: ignored interventions (0-2 points).
    let ignored = sessions.iter().filter(|s| s.was_ignored).count();
    score += (ignored as u8).min(MAX_IGNORED_POINTS);

    // Factor 4: any late-night session (+1).
    if sessions
        .iter()
        .any(|s| timectx::is_late_night(s.start_hour()))
    {
        score += LATE_NIGHT_POINTS;
    }

    score.min(MAX_DOOM_SCORE)
}

/// Statistics for one calendar day.
///
/// Created lazily the first time a day is touched, mutated throughout the
/// day, never deleted. `percentile_rank` is supplied externally and carried
/// along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    /// Canonical 0-10 doom score from [`compute_daily_score`].
    pub doom_score: u8,
    pub total_screen_time_secs: i64,
    /// Time spent in sessions the classifier marked as doom scrolling.
    pub doom_scroll_time_secs: i64,
    pub intervention_count: u32,
    pub successful_breaks: u32,
    pub ignored_interventions: u32,
    pub current_streak: u32,
    /// Monotonic; never decreases across the user's history.
    pub longest_streak: u32,
    /// App id -> seconds spent that day.
    pub app_usage: HashMap<String, i64>,
    /// Cumulative estimate of time reclaimed by successful breaks.
    pub time_saved_secs: i64,
    /// 0-100, externally supplied.
    pub percentile_rank: u8,
}

impl DailyStat {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            doom_score: 0,
            total_screen_time_secs: 0,
            doom_scroll_time_secs: 0,
            intervention_count: 0,
            successful_breaks: 0,
            ignored_interventions: 0,
            current_streak: 0,
            longest_streak: 0,
            app_usage: HashMap::new(),
            time_saved_secs: 0,
            percentile_rank: 50,
        }
    }

    /// Rebuild a day's derived fields from its closed sessions.
    ///
    /// Streak fields are left at zero; the streak tracker owns them. The
    /// aggregation is a pure fold, safe to re-run any number of times.
    pub fn aggregate(
        date: NaiveDate,
        sessions: &[Session],
        thresholds: &DetectionThresholds,
    ) -> Self {
        let mut stat = Self::new(date);
        stat.doom_score = compute_daily_score(sessions);

        for session in sessions {
            stat.total_screen_time_secs += session.duration_secs;
            if detect::is_doom_scrolling(session, thresholds) {
                stat.doom_scroll_time_secs += session.duration_secs;
            }
            if session.was_interrupted {
                stat.intervention_count += 1;
                if !session.was_ignored {
                    stat.successful_breaks += 1;
                }
            }
            if session.was_ignored {
                stat.ignored_interventions += 1;
            }
            *stat.app_usage.entry(session.app_id.clone()).or_insert(0) += session.duration_secs;
        }

        stat.time_saved_secs = i64::from(stat.successful_breaks) * TIME_SAVED_PER_BREAK_SECS;
        stat
    }

    /// Commentary for the current doom score.
    pub fn score_label(&self) -> &'static str {
        match self.doom_score {
            0 => "Perfect!",
            1..=2 => "Doing great!",
            3..=4 => "Not bad",
            5..=6 => "Could be better",
            7..=8 => "Yikes...",
            9 => "Terminally online",
            _ => "Touch grass. Seriously.",
        }
    }

    /// Commentary for the percentile rank.
    pub fn percentile_label(&self) -> String {
        format!("Better than {}% of users", 100 - u32::from(self.percentile_rank.min(100)))
    }
}
