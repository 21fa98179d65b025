//! The intervention message pools.
//!
//! Three weighted categories plus time-specific and frequency-keyed pools.
//! Frequency-tier messages are deterministic per count; everything else is a
//! uniform pick from its pool.

use indoc::indoc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::timectx::{day_part, DayPart};

/// Fallback when the funny pool would be empty.
pub const FALLBACK_FUNNY: &str = "Still scrolling?";
/// Fallback when the motivational pool would be empty.
pub const FALLBACK_MOTIVATIONAL: &str = "You can do better.";
/// Fallback when the reality-check pool would be empty.
pub const FALLBACK_REALITY_CHECK: &str = "Let's be real about your time.";

/// Funny/sarcastic messages.
pub const FUNNY: &[&str] = &[
    "Congrats, you've seen every meme on the internet. Twice.",
    "Your thumb is more active than you are.",
    "Still scrolling? The content doesn't get better.",
    "Fun fact: You could've learned Spanish in this time.",
    "This is literally called DOOM scrolling. The name isn't subtle.",
    "Breaking news: Nothing has changed since you last checked.",
    "The algorithm is laughing at you right now.",
    "Plot twist: All those posts are from yesterday.",
    "Imagine if you spent this time doing literally anything else.",
    "Your screen time could power a small country.",
    "Congrats, you've achieved peak brain rot.",
    "The person you're ignoring IRL misses you.",
    "This is the 4th time today. You good?",
    "Still here? The pixels aren't gonna scroll themselves. Oh wait...",
    "Fun fact: Grass exists outside.",
    "Your FYP is judging you.",
    "Achievement Unlocked: Professional Scroller",
    "This is intervention #7 today. Maybe we're onto something?",
    "The internet will still be here if you leave. Promise.",
    "Blink if you're being held hostage by your feed.",
    "Bet you forgot what you were looking for 30 minutes ago.",
    "Your battery is dying faster than your productivity.",
    "Main character energy: You're not the main character.",
    "That's 45 minutes you'll never get back. Worth it?",
    "Even your phone thinks this is excessive.",
    "Plot twist: Everyone else is also just scrolling.",
    "Congratulations, you've achieved absolutely nothing.",
    "Your brain cells are literally thanking you for stopping.",
    "The void scrolls back.",
    "Remember when you had hobbies?",
];

/// Motivational messages.
pub const MOTIVATIONAL: &[&str] = &[
    "You're better than this. Seriously.",
    "What are you avoiding right now?",
    "Real talk: How do you feel after scrolling?",
    "Is this how you want to spend the next hour?",
    "Future you is disappointed.",
    "Remember when you said you'd be productive today?",
    "The day is 1% over. Make it count.",
    "What would happen if you put your phone down?",
    "You've got one life. Is this it?",
    "Time you enjoy wasting isn't wasted... but is this enjoyable?",
    "Your goals are waiting for you.",
    "This moment could be different.",
    "You know what needs to be done.",
    "The dopamine isn't real, but your time is.",
    "Break the cycle. Right now.",
];

/// Reality-check messages. The duration placeholders ("32 minutes",
/// "45 minutes") are substituted textually by the selector.
pub const REALITY_CHECK: &[&str] = &[
    indoc! {"
        You've scrolled for 32 minutes.

        In that time you could've:
        - Finished a workout
        - Called a friend
        - Made dinner
        - Read 2 chapters
        - Taken a walk
        - Actually accomplished something

        Still worth it?"},
    indoc! {"
        That's 45 minutes. You just:
        - Watched 6 TikToks about productivity
        - Did zero productive things
        - See the irony?"},
    indoc! {"
        1 hour gone. Here's what you missed:
        - The sun (it's still up)
        - Human interaction
        - Physical movement
        - Your actual goals"},
    indoc! {"
        Let's do the math:
        25 minutes x 4 times a day = 100 minutes
        x 365 days = 608 hours per year

        That's 25 days. Twenty-five. Days."},
    indoc! {"
        In the time you've scrolled this week, you could have:
        - Learned to code (basics)
        - Read 3 books
        - Started a side project
        - Actually talked to people

        But here we are."},
];

const MORNING: &[&str] = &[
    "Morning doom scroll? Bold strategy.",
    "Starting the day scrolling. This won't end well.",
    "Imagine waking up and choosing violence (against yourself).",
    "Coffee first. Scrolling never.",
];

const LUNCH: &[&str] = &[
    "Lunch break doom scroll. Classic.",
    "Scrolling through lunch. Your food is judging you.",
    "This is literally your break time. Take an actual break.",
];

const PRE_BED: &[&str] = &[
    "Pre-bed doom scroll. RIP your sleep schedule.",
    "Blue light before bed. Your melatonin is crying.",
    "Your sleep quality just left the chat.",
    "This is why you're tired in the morning.",
];

/// Pick a message keyed to the hour's day-part bracket.
///
/// Hours outside every bracket fall back to the general funny pool.
pub fn time_specific(hour: u32, rng: &mut impl Rng) -> String {
    match day_part(hour) {
        DayPart::LateNight => {
            let pool = [
                format!("It's {hour}am. Even your phone wants to sleep."),
                "Midnight doom scroll? Bold strategy.".to_string(),
                "The sun gave up on you hours ago.".to_string(),
                "Your circadian rhythm is crying.".to_string(),
                format!("Nothing good happens on your phone at {hour}am."),
            ];
            pool.choose(rng)
                .cloned()
                .unwrap_or_else(|| FALLBACK_FUNNY.to_string())
        }
        DayPart::Morning => pick(MORNING, rng),
        DayPart::Lunch => pick(LUNCH, rng),
        DayPart::PreBed => pick(PRE_BED, rng),
        DayPart::Other => pick(FUNNY, rng),
    }
}

/// Message keyed to the number of interventions already shown today.
///
/// Counts 1-3 and 7-9 map to fixed strings; the other tiers interpolate the
/// count.
pub fn frequency_tier(interventions_today: u32) -> String {
    match interventions_today {
        1 => "First one today. Let's keep it that way.".to_string(),
        2 => "That's twice. Seeing a pattern?".to_string(),
        3 => "Three times. Maybe you need Accountability mode?".to_string(),
        4..=6 => format!("Intervention #{interventions_today}. Should we talk?"),
        7..=9 => "This is getting ridiculous. Lockdown mode exists for a reason.".to_string(),
        n => format!(
            "You've been caught {n} times today. That's... impressive? No, wait. Concerning."
        ),
    }
}

fn pick(pool: &[&str], rng: &mut impl Rng) -> String {
    pool.choose(rng)
        .copied()
        .unwrap_or(FALLBACK_FUNNY)
        .to_string()
}
