//! Contextual message selection.
//!
//! Selection is stochastic by design: the default algorithm rolls a weighted
//! category (70% funny, 20% motivational, 10% reality check) and each
//! category picks uniformly from its pool, with deterministic context
//! overrides layered on top. The RNG is injected so every probability is
//! reproducible under a fixed seed.

pub mod library;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::intervention::InterventionMode;
use crate::timectx::{day_part, DayPart};

/// Weighted d10 slices for the mixed roll: 1-7 funny, 8-9 motivational,
/// 10 reality check.
pub const FUNNY_WEIGHT: u32 = 7;
pub const MOTIVATIONAL_WEIGHT: u32 = 2;
pub const REALITY_CHECK_WEIGHT: u32 = 1;

/// Intervention count at which the funny category switches to frequency
/// tiers.
const FREQUENCY_OVERRIDE_AT: u32 = 3;

/// Chance of substituting a streak-referencing motivational message. The
/// check is a short-circuit pair of draws (a coin flip, then a unit draw
/// against this threshold), preserved exactly for reproducibility.
const STREAK_MESSAGE_CHANCE: f64 = 0.3;

/// User-selectable message flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    Funny,
    Motivational,
    Brutal,
    Mixed,
}

impl Default for MessageStyle {
    fn default() -> Self {
        MessageStyle::Funny
    }
}

/// Context an intervention is being presented in.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext {
    pub interventions_today: u32,
    /// Hour of day (0-23) at presentation time.
    pub hour: u32,
    pub scroll_duration_secs: i64,
    pub doom_score: u8,
    pub current_streak: u32,
}

/// Picks one message per intervention.
pub struct MessageSelector<R: Rng> {
    rng: R,
}

impl MessageSelector<Mcg128Xsl64> {
    /// Deterministic selector for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }
}

impl<R: Rng> MessageSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Default (mixed) selection: weighted category roll, then the category's
    /// own pick.
    pub fn select(&mut self, ctx: &MessageContext) -> String {
        let roll = self.rng.gen_range(1..=10u32);
        if roll <= FUNNY_WEIGHT {
            self.funny(ctx)
        } else if roll <= FUNNY_WEIGHT + MOTIVATIONAL_WEIGHT {
            self.motivational(ctx)
        } else {
            self.reality_check(ctx)
        }
    }

    /// Selection honoring the user's style preference.
    pub fn select_with_style(&mut self, ctx: &MessageContext, style: MessageStyle) -> String {
        match style {
            MessageStyle::Funny => self.funny(ctx),
            MessageStyle::Motivational => self.motivational(ctx),
            MessageStyle::Brutal => {
                // Brutal: frequency tiers as soon as there's a pattern,
                // reality checks otherwise.
                if ctx.interventions_today >= 2 {
                    library::frequency_tier(ctx.interventions_today)
                } else {
                    self.reality_check(ctx)
                }
            }
            MessageStyle::Mixed => self.select(ctx),
        }
    }

    /// Funny category with context overrides, checked in priority order:
    /// frequency tier, then day-part bracket, then the general pool.
    fn funny(&mut self, ctx: &MessageContext) -> String {
        if ctx.interventions_today >= FREQUENCY_OVERRIDE_AT {
            return library::frequency_tier(ctx.interventions_today);
        }
        if day_part(ctx.hour) != DayPart::Other {
            return library::time_specific(ctx.hour, &mut self.rng);
        }
        library::FUNNY
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(library::FALLBACK_FUNNY)
            .to_string()
    }

    fn motivational(&mut self, ctx: &MessageContext) -> String {
        if ctx.current_streak > 0 {
            let streak_messages = [
                format!(
                    "You had a {} day streak going. Don't break it now.",
                    ctx.current_streak
                ),
                format!(
                    "You're better than this. You've proven it for {} days.",
                    ctx.current_streak
                ),
            ];
            if self.rng.gen::<bool>() && self.rng.gen_range(0.0..1.0) < STREAK_MESSAGE_CHANCE {
                if let Some(message) = streak_messages.choose(&mut self.rng) {
                    return message.clone();
                }
            }
        }
        library::MOTIVATIONAL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(library::FALLBACK_MOTIVATIONAL)
            .to_string()
    }

    /// Reality-check category; duration placeholders are substituted by
    /// literal substring match, not structured templating.
    fn reality_check(&mut self, ctx: &MessageContext) -> String {
        let message = library::REALITY_CHECK
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(library::FALLBACK_REALITY_CHECK);

        let minutes = ctx.scroll_duration_secs / 60;
        if message.contains("32 minutes") {
            return message.replace("32 minutes", &format!("{minutes} minutes"));
        }
        if message.contains("45 minutes") {
            return message.replace("45 minutes", &format!("{minutes} minutes"));
        }
        message.to_string()
    }
}

/// Header line for the intervention screen.
pub fn intervention_header(
    mode: InterventionMode,
    ctx: &MessageContext,
    max_dismissals_per_day: u32,
) -> String {
    match mode {
        InterventionMode::Gentle => "Caught you!".to_string(),
        InterventionMode::Accountability => {
            if ctx.interventions_today >= max_dismissals_per_day {
                format!("That's {} ignores today.", ctx.interventions_today)
            } else {
                "Caught you!".to_string()
            }
        }
        InterventionMode::Lockdown => "DOOM SCROLL DETECTED".to_string(),
    }
}

/// Duration line for the intervention screen.
pub fn duration_message(duration_secs: i64) -> String {
    let minutes = duration_secs / 60;
    if minutes < 30 {
        format!("Been scrolling for {minutes} minutes.")
    } else if minutes < 60 {
        format!("Been scrolling for {minutes} minutes. That's half an hour.")
    } else {
        let hours = minutes / 60;
        let remaining = minutes % 60;
        format!("Been scrolling for {hours}h {remaining}m. Seriously.")
    }
}

/// Short duration formatting for message interpolation.
pub fn format_duration(duration_secs: i64) -> String {
    let hours = duration_secs / 3600;
    let minutes = duration_secs / 60 % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes} minutes")
    }
}
