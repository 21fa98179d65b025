//! Doom-scroll classification.
//!
//! `is_doom_scrolling` is a pure predicate over four threshold gates; the
//! live severity score is a separate 0-10 advisory estimate computed from the
//! same metrics. Both accept anything implementing [`ScrollMetrics`], so the
//! classifier runs identically against a closed [`Session`] and the live
//! accumulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{ActiveSession, Session};
use crate::timectx;

/// Smallest duration bound the user may configure (15 minutes).
pub const MIN_TIME_THRESHOLD_SECS: i64 = 900;
/// Largest duration bound the user may configure (60 minutes).
pub const MAX_TIME_THRESHOLD_SECS: i64 = 3600;

/// Canonical per-day doom score ceiling, shared with the daily calculator.
pub const MAX_SEVERITY: u8 = 10;

/// Fixed thresholds the classifier gates on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionThresholds {
    /// Minimum session duration before doom scrolling is possible (seconds).
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: i64,
    /// Interaction ratio above which the user counts as actively engaged.
    #[serde(default = "default_max_interaction_ratio")]
    pub max_interaction_ratio: f64,
    /// Minimum average scroll velocity for passive scrolling (px/s).
    #[serde(default = "default_min_scroll_velocity")]
    pub min_scroll_velocity: f64,
    /// Maximum app switches before the session counts as multitasking.
    #[serde(default = "default_max_app_switches")]
    pub max_app_switches: u32,
}

fn default_min_duration() -> i64 {
    1500 // 25 minutes
}
fn default_max_interaction_ratio() -> f64 {
    0.1
}
fn default_min_scroll_velocity() -> f64 {
    50.0
}
fn default_max_app_switches() -> u32 {
    5
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration(),
            max_interaction_ratio: default_max_interaction_ratio(),
            min_scroll_velocity: default_min_scroll_velocity(),
            max_app_switches: default_max_app_switches(),
        }
    }
}

/// Read-only view of session metrics the classifier consumes.
///
/// Implemented by both the closed [`Session`] record and the live
/// [`ActiveSession`] accumulator.
pub trait ScrollMetrics {
    fn duration_secs(&self) -> i64;
    fn scroll_events(&self) -> u32;
    fn interactions(&self) -> u32;
    fn app_switches(&self) -> u32;
    fn avg_scroll_velocity(&self) -> f64;
    fn start_time(&self) -> DateTime<Utc>;

    /// Interactions per scroll event, never divide-by-zero.
    fn interaction_ratio(&self) -> f64 {
        f64::from(self.interactions()) / f64::from(self.scroll_events()).max(1.0)
    }

    fn start_hour(&self) -> u32 {
        timectx::hour_of(self.start_time())
    }
}

impl ScrollMetrics for Session {
    fn duration_secs(&self) -> i64 {
        self.duration_secs
    }
    fn scroll_events(&self) -> u32 {
        self.scroll_events
    }
    fn interactions(&self) -> u32 {
        self.interactions
    }
    fn app_switches(&self) -> u32 {
        self.app_switches
    }
    fn avg_scroll_velocity(&self) -> f64 {
        self.avg_scroll_velocity
    }
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl ScrollMetrics for ActiveSession {
    fn duration_secs(&self) -> i64 {
        self.duration_secs
    }
    fn scroll_events(&self) -> u32 {
        self.scroll_events
    }
    fn interactions(&self) -> u32 {
        self.interactions
    }
    fn app_switches(&self) -> u32 {
        self.app_switches
    }
    fn avg_scroll_velocity(&self) -> f64 {
        ActiveSession::avg_scroll_velocity(self)
    }
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// Decide whether the session qualifies as passive doom scrolling.
pub fn is_doom_scrolling(metrics: &impl ScrollMetrics, thresholds: &DetectionThresholds) -> bool {
    // 1. Too short to matter, regardless of everything else.
    if metrics.duration_secs() < thresholds.min_duration_secs {
        return false;
    }

    // 2. Interaction ratio: above the cutoff they're engaging, not drifting.
    if metrics.interaction_ratio() > thresholds.max_interaction_ratio {
        return false;
    }

    // 3. Slow, deliberate scrolling is probably reading.
    if metrics.avg_scroll_velocity() < thresholds.min_scroll_velocity {
        return false;
    }

    // 4. Heavy context switching is active use.
    if metrics.app_switches() > thresholds.max_app_switches {
        return false;
    }

    true
}

/// Live severity estimate in 0-10.
///
/// Independent of classification; the late-night bonus contributes points
/// here but never flips `is_doom_scrolling`.
pub fn live_severity(metrics: &impl ScrollMetrics) -> u8 {
    let mut score: u8 = 0;

    score += match metrics.duration_secs() {
        d if d < 900 => 0,
        d if d < 1800 => 1,
        d if d < 3600 => 2,
        d if d < 7200 => 3,
        _ => 4,
    };

    let ratio = metrics.interaction_ratio();
    if ratio < 0.05 {
        score += 2;
    } else if ratio < 0.1 {
        score += 1;
    }

    let velocity = metrics.avg_scroll_velocity();
    if velocity > 150.0 {
        score += 2;
    } else if velocity > 100.0 {
        score += 1;
    }

    if timectx::is_late_night(metrics.start_hour()) {
        score += 2;
    }

    score.min(MAX_SEVERITY)
}

/// Human-readable digest of a session's metrics for diagnostics.
pub fn session_report(metrics: &impl ScrollMetrics, thresholds: &DetectionThresholds) -> String {
    format!(
        "duration: {}s\nscroll events: {}\ninteractions: {}\ninteraction ratio: {:.2}%\napp switches: {}\nscroll velocity: {:.1} px/s\ndoom scrolling: {}",
        metrics.duration_secs(),
        metrics.scroll_events(),
        metrics.interactions(),
        metrics.interaction_ratio() * 100.0,
        metrics.app_switches(),
        metrics.avg_scroll_velocity(),
        if is_doom_scrolling(metrics, thresholds) { "yes" } else { "no" },
    )
}
