//! Intervention modes and the per-occurrence state machine.

mod driver;
mod occurrence;

pub use driver::CountdownDriver;
pub use occurrence::{DismissOutcome, InterventionOccurrence, LockdownChallenge, Phase};

use serde::{Deserialize, Serialize};

/// How aggressively the engine interrupts a detected doom scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterventionMode {
    /// Soft reminder, dismissible immediately.
    Gentle,
    /// Short forced wait and a daily dismissal budget.
    Accountability,
    /// Dismissal gated on solving a challenge or sitting out a longer wait.
    Lockdown,
}

impl InterventionMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            InterventionMode::Gentle => "Gentle",
            InterventionMode::Accountability => "Accountability",
            InterventionMode::Lockdown => "Lockdown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InterventionMode::Gentle => "Soft reminder, easy dismiss",
            InterventionMode::Accountability => "10s wait, 3 ignores max",
            InterventionMode::Lockdown => "Complete task to continue",
        }
    }
}

impl Default for InterventionMode {
    fn default() -> Self {
        InterventionMode::Accountability
    }
}

/// Timers and budgets governing intervention occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionConfig {
    /// Seconds before the dismiss control appears in accountability mode.
    #[serde(default = "default_accountability_wait")]
    pub accountability_wait_secs: u32,
    /// Dismissals allowed per day in accountability mode.
    #[serde(default = "default_max_dismissals")]
    pub max_dismissals_per_day: u32,
    /// Seconds of the opt-in lockdown wait path.
    #[serde(default = "default_lockdown_wait")]
    pub lockdown_wait_secs: u32,
    /// Cooldown the host applies between lockdown occurrences (minutes).
    #[serde(default = "default_lockdown_cooldown")]
    pub lockdown_cooldown_mins: u32,
}

fn default_accountability_wait() -> u32 {
    10
}
fn default_max_dismissals() -> u32 {
    3
}
fn default_lockdown_wait() -> u32 {
    60
}
fn default_lockdown_cooldown() -> u32 {
    15
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            accountability_wait_secs: default_accountability_wait(),
            max_dismissals_per_day: default_max_dismissals(),
            lockdown_wait_secs: default_lockdown_wait(),
            lockdown_cooldown_mins: default_lockdown_cooldown(),
        }
    }
}

/// Emitted by `tick()` so the presentation and haptics collaborators can
/// react to countdown progress and eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InterventionEvent {
    CountdownTick { remaining_secs: u32 },
    EligibilityGranted,
}
