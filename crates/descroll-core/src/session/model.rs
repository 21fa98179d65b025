//! The closed scroll-session record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intervention::InterventionMode;
use crate::timectx;

/// How the user answered an intervention prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseType {
    WorthIt,
    Waste,
    JustBreak,
    Dismissed,
}

impl ResponseType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResponseType::WorthIt => "Worth it - saw good stuff",
            ResponseType::Waste => "Total waste - help me stop",
            ResponseType::JustBreak => "Just taking a break",
            ResponseType::Dismissed => "Dismissed",
        }
    }
}

/// A single usage session of a monitored app.
///
/// Sessions are created by [`super::SessionTracker`] and immutable once
/// `end_time` is set -- the tracker only hands out closed sessions by value.
/// Each session belongs to the calendar day of its `start_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub app_id: String,
    /// Wall-clock length of the session in seconds.
    pub duration_secs: i64,
    pub scroll_events: u32,
    pub interactions: u32,
    pub app_switches: u32,
    /// Average scroll velocity in pixels/second across the session.
    pub avg_scroll_velocity: f64,
    pub was_interrupted: bool,
    pub was_ignored: bool,
    pub user_response: Option<ResponseType>,
    pub note: Option<String>,
    /// The intervention message shown during this session, if any.
    pub message_shown: Option<String>,
    /// Intervention mode that was active when the session ran.
    pub intervention_mode: InterventionMode,
}

impl Session {
    /// Interactions per scroll event. Well-defined for zero scroll events.
    pub fn interaction_ratio(&self) -> f64 {
        f64::from(self.interactions) / f64::from(self.scroll_events).max(1.0)
    }

    /// Hour of day (0-23) the session started.
    pub fn start_hour(&self) -> u32 {
        timectx::hour_of(self.start_time)
    }

    /// Calendar day the session belongs to.
    pub fn start_day(&self) -> NaiveDate {
        timectx::day_of(self.start_time)
    }
}
