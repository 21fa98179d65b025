//! The per-occurrence intervention state machine.
//!
//! One occurrence lives for one presented intervention and is discarded after
//! resolution. Progress runs `Presented -> WaitingForEligibility -> Eligible
//! -> Resolved`; which transitions are reachable depends on the mode.
//!
//! The machine has no internal clock: the host (or
//! [`super::CountdownDriver`]) calls `tick()` once per elapsed second. All
//! mutation goes through `&mut self`, so countdown ticking can never race a
//! concurrent `dismiss()` or `check_answer()` as long as the occurrence sits
//! behind a single lock.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{InterventionConfig, InterventionEvent, InterventionMode};
use crate::error::{Result, StateError};

/// Lifecycle phase of one intervention occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Presented,
    WaitingForEligibility,
    Eligible,
    Resolved,
}

/// Two-operand addition challenge shown in lockdown mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockdownChallenge {
    a: u32,
    b: u32,
}

impl LockdownChallenge {
    /// Operands are drawn uniformly from this range.
    pub const OPERAND_RANGE: std::ops::RangeInclusive<u32> = 10..=50;

    pub fn generate(rng: &mut impl Rng) -> Self {
        Self {
            a: rng.gen_range(Self::OPERAND_RANGE),
            b: rng.gen_range(Self::OPERAND_RANGE),
        }
    }

    pub fn prompt(&self) -> String {
        format!("What's {} + {}?", self.a, self.b)
    }

    pub fn answer(&self) -> u32 {
        self.a + self.b
    }

    /// Whether `text` is exactly the expected sum.
    fn accepts(&self, text: &str) -> bool {
        text.trim()
            .parse::<i64>()
            .map(|n| n == i64::from(self.answer()))
            .unwrap_or(false)
    }
}

/// Result of a successful `dismiss()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissOutcome {
    /// Dismissal count for the day after this dismissal.
    pub dismissals_today: u32,
    /// The dismissal budget is now spent; routing subsequent occurrences to
    /// lockdown is the caller's decision.
    pub escalate: bool,
}

/// One presented intervention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionOccurrence {
    mode: InterventionMode,
    message: String,
    phase: Phase,
    wait_remaining_secs: u32,
    /// Whether a countdown is currently running.
    countdown_armed: bool,
    dismissals_today: u32,
    challenge: Option<LockdownChallenge>,
    config: InterventionConfig,
}

impl InterventionOccurrence {
    /// Build an occurrence for `mode` with the message already selected.
    ///
    /// `dismissals_today` is the day's running count, passed in rather than
    /// fetched ambiently. The RNG is only consulted in lockdown mode, for the
    /// challenge operands.
    pub fn new(
        mode: InterventionMode,
        message: String,
        dismissals_today: u32,
        config: &InterventionConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let (phase, wait_remaining_secs, countdown_armed, challenge) = match mode {
            InterventionMode::Gentle => (Phase::Eligible, 0, false, None),
            InterventionMode::Accountability => (
                Phase::WaitingForEligibility,
                config.accountability_wait_secs,
                true,
                None,
            ),
            InterventionMode::Lockdown => (
                Phase::Presented,
                0,
                false,
                Some(LockdownChallenge::generate(rng)),
            ),
        };

        Self {
            mode,
            message,
            phase,
            wait_remaining_secs,
            countdown_armed,
            dismissals_today,
            challenge,
            config: *config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> InterventionMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn wait_remaining_secs(&self) -> u32 {
        self.wait_remaining_secs
    }

    pub fn dismissals_today(&self) -> u32 {
        self.dismissals_today
    }

    pub fn can_dismiss(&self) -> bool {
        self.phase == Phase::Eligible
    }

    /// The lockdown challenge, present only in lockdown mode.
    pub fn challenge(&self) -> Option<&LockdownChallenge> {
        self.challenge.as_ref()
    }

    /// Whether a countdown is still running and needs further ticks.
    pub fn countdown_active(&self) -> bool {
        self.countdown_armed && self.phase == Phase::WaitingForEligibility
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the countdown by one second.
    ///
    /// In accountability mode a finished countdown grants eligibility only
    /// while the dismissal budget has room; a spent budget keeps the
    /// occurrence non-dismissible no matter how long it ticks. The lockdown
    /// alternate wait grants eligibility unconditionally on expiry.
    pub fn tick(&mut self) -> Option<InterventionEvent> {
        if !self.countdown_active() {
            return None;
        }

        self.wait_remaining_secs = self.wait_remaining_secs.saturating_sub(1);
        if self.wait_remaining_secs > 0 {
            return Some(InterventionEvent::CountdownTick {
                remaining_secs: self.wait_remaining_secs,
            });
        }

        self.countdown_armed = false;
        match self.mode {
            InterventionMode::Accountability => {
                if self.dismissals_today < self.config.max_dismissals_per_day {
                    self.phase = Phase::Eligible;
                    Some(InterventionEvent::EligibilityGranted)
                } else {
                    // Budget spent: countdown expiry changes nothing.
                    None
                }
            }
            InterventionMode::Lockdown => {
                self.phase = Phase::Eligible;
                Some(InterventionEvent::EligibilityGranted)
            }
            InterventionMode::Gentle => None,
        }
    }

    /// Check a lockdown answer, called on every keystroke.
    ///
    /// Returns whether the occurrence is (now) eligible via the challenge
    /// path. Non-matching text leaves the state unchanged; outside lockdown
    /// mode this is a no-op. A correct answer abandons any running alternate
    /// wait.
    pub fn check_answer(&mut self, text: &str) -> bool {
        if self.mode != InterventionMode::Lockdown {
            return false;
        }
        match self.phase {
            Phase::Eligible => true,
            Phase::Resolved => false,
            Phase::Presented | Phase::WaitingForEligibility => {
                let correct = self
                    .challenge
                    .as_ref()
                    .map(|c| c.accepts(text))
                    .unwrap_or(false);
                if correct {
                    self.phase = Phase::Eligible;
                    self.countdown_armed = false;
                }
                correct
            }
        }
    }

    /// Opt into the fixed lockdown wait instead of solving the challenge.
    ///
    /// No-op outside lockdown mode or once a path has already resolved.
    pub fn start_alternate_wait(&mut self) {
        if self.mode != InterventionMode::Lockdown || self.phase != Phase::Presented {
            return;
        }
        self.phase = Phase::WaitingForEligibility;
        self.wait_remaining_secs = self.config.lockdown_wait_secs;
        self.countdown_armed = true;
    }

    /// Dismiss an eligible occurrence.
    ///
    /// Fails with [`StateError::NotDismissible`] in any other phase. In
    /// accountability mode the day's dismissal counter advances, and the
    /// outcome flags escalation once the budget is spent.
    pub fn dismiss(&mut self) -> Result<DismissOutcome> {
        if self.phase != Phase::Eligible {
            return Err(StateError::NotDismissible.into());
        }
        self.phase = Phase::Resolved;
        self.countdown_armed = false;

        let mut escalate = false;
        if self.mode == InterventionMode::Accountability {
            self.dismissals_today += 1;
            if self.dismissals_today >= self.config.max_dismissals_per_day {
                log::warn!(
                    "dismissal budget spent ({} today); escalation suggested",
                    self.dismissals_today
                );
                escalate = true;
            }
        }

        Ok(DismissOutcome {
            dismissals_today: self.dismissals_today,
            escalate,
        })
    }
}
