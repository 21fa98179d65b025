//! Hour-of-day and calendar-day helpers backing policy decisions.
//!
//! Everything here is a pure function over a timestamp. The day-part brackets
//! drive both the classifier's late-night scoring and the time-specific
//! message pools.

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Hours considered late-night scrolling (midnight through 5am).
pub const LATE_NIGHT_HOURS: RangeInclusive<u32> = 0..=5;
/// Early-morning hours.
pub const MORNING_HOURS: RangeInclusive<u32> = 6..=8;
/// Lunch-break hours.
pub const LUNCH_HOURS: RangeInclusive<u32> = 12..=13;
/// Pre-bed hours.
pub const PRE_BED_HOURS: RangeInclusive<u32> = 22..=23;

/// Severity multiplier applied to late-night activity in reports.
///
/// Advisory only: it scales nothing that is persisted and never flips a
/// classification. Consumers that want to weight late-night activity in a
/// report can read it from [`late_night_multiplier`].
pub const LATE_NIGHT_MULTIPLIER: f64 = 1.5;

/// Named bracket of the day used for policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    LateNight,
    Morning,
    Lunch,
    PreBed,
    Other,
}

/// Hour of day (0-23) for a timestamp.
pub fn hour_of(ts: DateTime<Utc>) -> u32 {
    ts.hour()
}

/// Calendar-day bucket for a timestamp.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

pub fn is_late_night(hour: u32) -> bool {
    LATE_NIGHT_HOURS.contains(&hour)
}

/// Classify an hour into its day-part bracket.
pub fn day_part(hour: u32) -> DayPart {
    if LATE_NIGHT_HOURS.contains(&hour) {
        DayPart::LateNight
    } else if MORNING_HOURS.contains(&hour) {
        DayPart::Morning
    } else if LUNCH_HOURS.contains(&hour) {
        DayPart::Lunch
    } else if PRE_BED_HOURS.contains(&hour) {
        DayPart::PreBed
    } else {
        DayPart::Other
    }
}

/// Reporting-only severity multiplier for an hour.
pub fn late_night_multiplier(hour: u32) -> f64 {
    if is_late_night(hour) {
        LATE_NIGHT_MULTIPLIER
    } else {
        1.0
    }
}
