//! Engine facade wiring the full data flow.
//!
//! Telemetry accumulates in the tracker; a closed session is persisted, the
//! day is re-aggregated, the streak recomputed, and the achievement rules
//! evaluated -- in that order, with the complete result computed before
//! anything is handed to the store. Live classification and intervention
//! construction run off the same state.

use chrono::{DateTime, NaiveDate, Utc};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use crate::achievements::{Achievement, AchievementLedger};
use crate::config::Settings;
use crate::detect;
use crate::error::{Result, StateError};
use crate::intervention::{DismissOutcome, InterventionOccurrence};
use crate::messages::{MessageContext, MessageSelector};
use crate::session::{ActiveSession, ResponseType, Session, SessionTracker};
use crate::stats::{compute_streak, DailyStat, StreakSummary};
use crate::store::RecordStore;
use crate::timectx;

/// Everything recomputed when a session closes.
#[derive(Debug, Clone)]
pub struct DayRollup {
    pub session: Session,
    pub daily: DailyStat,
    pub streak: StreakSummary,
    pub new_achievements: Vec<Achievement>,
}

/// The behavior-intervention engine.
///
/// Owns the tracker, the achievement ledger, and a seedable RNG; talks to
/// persistence only through the injected [`RecordStore`].
pub struct Engine<S: RecordStore> {
    settings: Settings,
    tracker: SessionTracker,
    ledger: AchievementLedger,
    rng: Mcg128Xsl64,
    store: S,
    /// Accountability dismissals per day, reset when the day changes.
    dismissals: (NaiveDate, u32),
}

impl<S: RecordStore> Engine<S> {
    /// Build an engine over `store`, restoring the achievement ledger from
    /// persisted records.
    pub fn new(settings: Settings, store: S) -> Result<Self> {
        settings.validate()?;
        let records = store.achievements()?;
        let rng = match settings.rng_seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Ok(Self {
            settings,
            tracker: SessionTracker::new(),
            ledger: AchievementLedger::from_records(records),
            rng,
            store,
            dismissals: (NaiveDate::MIN, 0),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &AchievementLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Telemetry ────────────────────────────────────────────────────

    pub fn start_session(&mut self, app_id: &str) -> Result<()> {
        self.tracker.start(app_id, self.settings.intervention_mode)
    }

    pub fn record_scroll(&mut self, velocity: f64) -> Result<()> {
        self.tracker.record_scroll(velocity)
    }

    pub fn record_interaction(&mut self) {
        self.tracker.record_interaction();
    }

    pub fn record_app_switch(&mut self) {
        self.tracker.record_app_switch();
    }

    pub fn mark_ignored(&mut self) {
        self.tracker.mark_ignored();
    }

    pub fn record_response(&mut self, response: ResponseType, note: Option<String>) {
        self.tracker.set_response(response, note);
    }

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.tracker.active()
    }

    // ── Live classification ──────────────────────────────────────────

    /// Whether the open session currently classifies as doom scrolling.
    pub fn is_doom_scrolling(&self) -> bool {
        self.tracker
            .active()
            .map(|a| detect::is_doom_scrolling(a, &self.settings.detection))
            .unwrap_or(false)
    }

    /// Live 0-10 severity estimate for the open session.
    pub fn live_severity(&self) -> u8 {
        self.tracker
            .active()
            .map(|a| detect::live_severity(a))
            .unwrap_or(0)
    }

    // ── Interventions ────────────────────────────────────────────────

    /// Build an intervention occurrence for the open session.
    ///
    /// Selects a message from today's context, stamps the session as
    /// interrupted, and hands back the state machine for the presentation
    /// layer to drive. Fails when no session is open.
    pub fn begin_intervention(&mut self, now: DateTime<Utc>) -> Result<InterventionOccurrence> {
        let active = self.tracker.active().ok_or(StateError::NoActiveSession)?;
        let duration_secs = (now - active.start_time).num_seconds().max(0);

        let today = timectx::day_of(now);
        let today_stat = self.store.daily_stat(today)?;
        let ctx = MessageContext {
            interventions_today: today_stat.as_ref().map(|s| s.intervention_count).unwrap_or(0),
            hour: timectx::hour_of(now),
            scroll_duration_secs: duration_secs,
            doom_score: today_stat.as_ref().map(|s| s.doom_score).unwrap_or(0),
            current_streak: today_stat.as_ref().map(|s| s.current_streak).unwrap_or(0),
        };

        let message = MessageSelector::with_rng(&mut self.rng)
            .select_with_style(&ctx, self.settings.message_style);

        self.tracker.mark_interrupted();
        self.tracker.set_message_shown(&message);
        log::info!(
            "intervention presented ({:?}, {}s in)",
            self.settings.intervention_mode,
            duration_secs
        );

        Ok(InterventionOccurrence::new(
            self.settings.intervention_mode,
            message,
            self.dismissals_today(today),
            &self.settings.intervention,
            &mut self.rng,
        ))
    }

    /// Dismissals recorded so far on `day`.
    pub fn dismissals_today(&self, day: NaiveDate) -> u32 {
        if self.dismissals.0 == day {
            self.dismissals.1
        } else {
            0
        }
    }

    /// Fold a resolved occurrence's outcome back into the day's counters.
    pub fn note_dismissal(&mut self, outcome: &DismissOutcome, now: DateTime<Utc>) {
        let today = timectx::day_of(now);
        self.dismissals = (today, outcome.dismissals_today);
        if outcome.escalate {
            log::warn!("dismissal budget spent; caller may route to lockdown");
        }
    }

    // ── Session close ────────────────────────────────────────────────

    /// Close the open session and recompute everything downstream of it.
    pub fn end_session(&mut self) -> Result<DayRollup> {
        let session = self.tracker.end()?;
        let day = session.start_day();

        self.store.save_session(&session)?;
        let day_sessions = self.store.sessions_on(day)?;

        let mut daily = DailyStat::aggregate(day, &day_sessions, &self.settings.detection);
        if let Some(previous) = self.store.daily_stat(day)? {
            // Externally supplied; not recomputed here.
            daily.percentile_rank = previous.percentile_rank;
        }

        let mut history = self.store.stats_history()?;
        history.retain(|stat| stat.date != day);
        history.push(daily.clone());
        let streak = compute_streak(day, &history);
        daily.current_streak = streak.current;
        daily.longest_streak = streak.longest;

        self.store.save_daily_stat(&daily)?;

        let all_sessions = self.store.all_sessions()?;
        let new_achievements = self.ledger.evaluate(&daily, &all_sessions, Utc::now());
        if !new_achievements.is_empty() {
            self.store
                .save_achievements(self.ledger.records())
                ?;
        }

        Ok(DayRollup {
            session,
            daily,
            streak,
            new_achievements,
        })
    }
}
