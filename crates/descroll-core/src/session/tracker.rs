//! Live session accumulation.
//!
//! The tracker owns at most one in-progress session. Telemetry callbacks
//! accumulate into it; `end()` freezes it into an immutable [`Session`].
//! Recording calls with no open session are no-ops, not errors -- the
//! telemetry source does not know whether tracking is active.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{ResponseType, Session};
use crate::error::{Result, StateError, ValidationError};
use crate::intervention::InterventionMode;

/// The in-progress session accumulator.
///
/// Mutated only through [`SessionTracker`]; exposed read-only so the
/// classifier can evaluate a session that is still open.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    id: Uuid,
    pub start_time: DateTime<Utc>,
    pub app_id: String,
    pub duration_secs: i64,
    pub scroll_events: u32,
    pub interactions: u32,
    pub app_switches: u32,
    velocity_sum: f64,
    velocity_samples: u32,
    was_interrupted: bool,
    was_ignored: bool,
    user_response: Option<ResponseType>,
    note: Option<String>,
    message_shown: Option<String>,
    intervention_mode: InterventionMode,
}

impl ActiveSession {
    fn new(app_id: String, intervention_mode: InterventionMode, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: now,
            app_id,
            duration_secs: 0,
            scroll_events: 0,
            interactions: 0,
            app_switches: 0,
            velocity_sum: 0.0,
            velocity_samples: 0,
            was_interrupted: false,
            was_ignored: false,
            user_response: None,
            note: None,
            message_shown: None,
            intervention_mode,
        }
    }

    /// Running average of recorded scroll velocities (px/s).
    pub fn avg_scroll_velocity(&self) -> f64 {
        if self.velocity_samples == 0 {
            0.0
        } else {
            self.velocity_sum / f64::from(self.velocity_samples)
        }
    }

    pub fn interaction_ratio(&self) -> f64 {
        f64::from(self.interactions) / f64::from(self.scroll_events).max(1.0)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.duration_secs = (now - self.start_time).num_seconds().max(0);
    }

    fn close(mut self, now: DateTime<Utc>) -> Session {
        self.touch(now);
        Session {
            id: self.id,
            start_time: self.start_time,
            end_time: Some(now),
            app_id: self.app_id,
            duration_secs: self.duration_secs,
            scroll_events: self.scroll_events,
            interactions: self.interactions,
            app_switches: self.app_switches,
            avg_scroll_velocity: if self.velocity_samples == 0 {
                0.0
            } else {
                self.velocity_sum / f64::from(self.velocity_samples)
            },
            was_interrupted: self.was_interrupted,
            was_ignored: self.was_ignored,
            user_response: self.user_response,
            note: self.note,
            message_shown: self.message_shown,
            intervention_mode: self.intervention_mode,
        }
    }
}

/// Accumulates telemetry events into a single in-progress session.
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The open accumulator, if any.
    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Open a new session for `app_id`.
    ///
    /// Fails with [`StateError::AlreadyActive`] if a session is open, and
    /// rejects empty app identifiers.
    pub fn start(&mut self, app_id: &str, intervention_mode: InterventionMode) -> Result<()> {
        if self.active.is_some() {
            return Err(StateError::AlreadyActive.into());
        }
        let app_id = app_id.trim();
        if app_id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "app_id".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        log::debug!("session started for {app_id}");
        self.active = Some(ActiveSession::new(
            app_id.to_string(),
            intervention_mode,
            Utc::now(),
        ));
        Ok(())
    }

    /// Record a scroll event with its velocity in px/s.
    ///
    /// Negative or non-finite velocities are rejected; a closed tracker
    /// swallows the event.
    pub fn record_scroll(&mut self, velocity: f64) -> Result<()> {
        if !velocity.is_finite() || velocity < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "velocity".to_string(),
                message: format!("must be a non-negative finite number, got {velocity}"),
            }
            .into());
        }
        if let Some(session) = self.active.as_mut() {
            session.scroll_events += 1;
            session.velocity_sum += velocity;
            session.velocity_samples += 1;
            session.touch(Utc::now());
        }
        Ok(())
    }

    /// Record an interaction (like, comment, post).
    pub fn record_interaction(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.interactions += 1;
            session.touch(Utc::now());
        }
    }

    /// Record a switch to another app.
    pub fn record_app_switch(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.app_switches += 1;
            session.touch(Utc::now());
        }
    }

    /// Stamp the open session as interrupted by an intervention.
    pub fn mark_interrupted(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.was_interrupted = true;
        }
    }

    /// Stamp the open session as having ignored an intervention.
    pub fn mark_ignored(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.was_ignored = true;
        }
    }

    /// Record the user's answer to an intervention prompt.
    pub fn set_response(&mut self, response: ResponseType, note: Option<String>) {
        if let Some(session) = self.active.as_mut() {
            session.user_response = Some(response);
            session.note = note;
        }
    }

    /// Remember the intervention message shown during this session.
    pub fn set_message_shown(&mut self, message: &str) {
        if let Some(session) = self.active.as_mut() {
            session.message_shown = Some(message.to_string());
        }
    }

    /// Close the open session into an immutable [`Session`].
    ///
    /// Fails with [`StateError::NoActiveSession`] when nothing is open.
    pub fn end(&mut self) -> Result<Session> {
        let session = self.active.take().ok_or(StateError::NoActiveSession)?;
        let closed = session.close(Utc::now());
        log::debug!(
            "session ended for {} after {}s",
            closed.app_id,
            closed.duration_secs
        );
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn start_twice_fails() {
        let mut tracker = SessionTracker::new();
        tracker
            .start("com.example.feed", InterventionMode::Gentle)
            .unwrap();
        let err = tracker
            .start("com.example.feed", InterventionMode::Gentle)
            .unwrap_err();
        assert!(matches!(err, CoreError::State(StateError::AlreadyActive)));
    }

    #[test]
    fn end_without_start_fails() {
        let mut tracker = SessionTracker::new();
        let err = tracker.end().unwrap_err();
        assert!(matches!(err, CoreError::State(StateError::NoActiveSession)));
    }

    #[test]
    fn empty_app_id_rejected() {
        let mut tracker = SessionTracker::new();
        let err = tracker.start("   ", InterventionMode::Gentle).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(!tracker.is_active());
    }

    #[test]
    fn negative_velocity_rejected() {
        let mut tracker = SessionTracker::new();
        tracker
            .start("com.example.feed", InterventionMode::Gentle)
            .unwrap();
        assert!(tracker.record_scroll(-1.0).is_err());
        assert!(tracker.record_scroll(f64::NAN).is_err());
        // Rejected events must not count.
        assert_eq!(tracker.active().unwrap().scroll_events, 0);
    }

    #[test]
    fn recording_without_session_is_noop() {
        let mut tracker = SessionTracker::new();
        tracker.record_scroll(120.0).unwrap();
        tracker.record_interaction();
        tracker.record_app_switch();
        assert!(!tracker.is_active());
    }

    #[test]
    fn velocity_averages_across_events() {
        let mut tracker = SessionTracker::new();
        tracker
            .start("com.example.feed", InterventionMode::Gentle)
            .unwrap();
        tracker.record_scroll(100.0).unwrap();
        tracker.record_scroll(200.0).unwrap();
        let session = tracker.end().unwrap();
        assert_eq!(session.scroll_events, 2);
        assert!((session.avg_scroll_velocity - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn closed_session_carries_flags_and_response() {
        let mut tracker = SessionTracker::new();
        tracker
            .start("com.example.feed", InterventionMode::Accountability)
            .unwrap();
        tracker.mark_interrupted();
        tracker.set_response(ResponseType::Waste, Some("ugh".to_string()));
        tracker.set_message_shown("Still scrolling?");
        let session = tracker.end().unwrap();
        assert!(session.was_interrupted);
        assert!(!session.was_ignored);
        assert_eq!(session.user_response, Some(ResponseType::Waste));
        assert_eq!(session.note.as_deref(), Some("ugh"));
        assert_eq!(session.message_shown.as_deref(), Some("Still scrolling?"));
        assert_eq!(session.intervention_mode, InterventionMode::Accountability);
        assert!(session.end_time.is_some());
        assert!(!tracker.is_active());
    }
}
