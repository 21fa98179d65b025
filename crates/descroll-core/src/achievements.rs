//! Achievement rules and the unlock ledger.
//!
//! A fixed, ordered rule set evaluated whenever stats are recomputed. Every
//! rule is guarded by the unlocked set, so evaluation is append-only and
//! idempotent: re-running with the same inputs never double-unlocks and never
//! un-unlocks.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::stats::DailyStat;

/// App-id fragment the addict rule counts sessions against.
pub const ADDICT_APP_MARKER: &str = "tiktok";

const REFORMED_MAX_DOOM_SECS: i64 = 1800; // < 30 min today
const TOP_TEN_PERCENTILE: u8 = 10;
const DOOM_LORD_SECS: i64 = 36_000; // 10 hours in a day
const NIGHT_OWL_HOUR: u32 = 3;
const SERIAL_SCROLLER_IGNORES: usize = 50;
const ADDICT_SESSION_COUNT: usize = 100;
const IGNORANT_RUN_LENGTH: u32 = 10;

/// The closed set of unlockable achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Achievement {
    // Positive
    TouchGrass,
    WeekWarrior,
    Reformed,
    TopTen,
    MonthClean,
    StreakMaster,
    // Sarcastic
    DoomLord,
    NightOwl,
    SerialScroller,
    Addict,
    Ignorant,
}

impl Achievement {
    /// Every achievement, in evaluation order.
    pub const ALL: [Achievement; 11] = [
        Achievement::TouchGrass,
        Achievement::WeekWarrior,
        Achievement::Reformed,
        Achievement::TopTen,
        Achievement::MonthClean,
        Achievement::StreakMaster,
        Achievement::DoomLord,
        Achievement::NightOwl,
        Achievement::SerialScroller,
        Achievement::Addict,
        Achievement::Ignorant,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Achievement::TouchGrass => "Touch Grass",
            Achievement::WeekWarrior => "Week Warrior",
            Achievement::Reformed => "Reformed",
            Achievement::TopTen => "Top 10%",
            Achievement::MonthClean => "Month Clean",
            Achievement::StreakMaster => "Streak Master",
            Achievement::DoomLord => "Doom Lord",
            Achievement::NightOwl => "Night Owl",
            Achievement::SerialScroller => "Serial Scroller",
            Achievement::Addict => "Addict",
            Achievement::Ignorant => "Ignorant",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::TouchGrass => "24 hours clean",
            Achievement::WeekWarrior => "7 day streak",
            Achievement::Reformed => "30 days with <30min daily avg",
            Achievement::TopTen => "Top 10% of users",
            Achievement::MonthClean => "30 day streak",
            Achievement::StreakMaster => "100 day streak",
            Achievement::DoomLord => "Scrolled 10+ hours in a day",
            Achievement::NightOwl => "3am doom scroll session",
            Achievement::SerialScroller => "Dismissed 50 interventions",
            Achievement::Addict => "Opened TikTok 100 times in a day",
            Achievement::Ignorant => "Ignored 10 interventions in a row",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            Achievement::TouchGrass
                | Achievement::WeekWarrior
                | Achievement::Reformed
                | Achievement::TopTen
                | Achievement::MonthClean
                | Achievement::StreakMaster
        )
    }

    /// Whether this achievement's condition holds for the given stats and
    /// session history.
    fn satisfied(&self, stats: &DailyStat, sessions: &[Session]) -> bool {
        match self {
            Achievement::TouchGrass => stats.current_streak >= 1,
            Achievement::WeekWarrior => stats.current_streak >= 7,
            // Approximates the 30-day average by today's doom time only.
            Achievement::Reformed => {
                stats.current_streak >= 30 && stats.doom_scroll_time_secs < REFORMED_MAX_DOOM_SECS
            }
            Achievement::TopTen => stats.percentile_rank <= TOP_TEN_PERCENTILE,
            Achievement::MonthClean => stats.current_streak >= 30,
            Achievement::StreakMaster => stats.current_streak >= 100,
            Achievement::DoomLord => stats.doom_scroll_time_secs >= DOOM_LORD_SECS,
            Achievement::NightOwl => sessions.iter().any(|s| s.start_hour() == NIGHT_OWL_HOUR),
            Achievement::SerialScroller => {
                sessions.iter().filter(|s| s.was_ignored).count() >= SERIAL_SCROLLER_IGNORES
            }
            Achievement::Addict => {
                sessions
                    .iter()
                    .filter(|s| s.app_id.to_ascii_lowercase().contains(ADDICT_APP_MARKER))
                    .count()
                    >= ADDICT_SESSION_COUNT
            }
            Achievement::Ignorant => longest_ignored_run(sessions) >= IGNORANT_RUN_LENGTH,
        }
    }
}

/// Longest run of ignored sessions in ascending start-time order.
///
/// An interrupted session resets the run; sessions that are neither ignored
/// nor interrupted leave it untouched. A session that is both ignored and
/// interrupted counts as ignored.
fn longest_ignored_run(sessions: &[Session]) -> u32 {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.start_time);

    let mut run = 0u32;
    let mut longest = 0u32;
    for session in ordered {
        if session.was_ignored {
            run += 1;
            longest = longest.max(run);
        } else if session.was_interrupted {
            run = 0;
        }
    }
    longest
}

/// A persisted unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub achievement: Achievement,
    pub unlocked_at: DateTime<Utc>,
    pub shared: bool,
}

/// The unlocked-achievement set plus its records.
///
/// State is loaded from and handed back to the persistence collaborator; the
/// ledger itself never reaches out to storage.
#[derive(Debug, Clone, Default)]
pub struct AchievementLedger {
    records: Vec<AchievementRecord>,
    unlocked: HashSet<Achievement>,
}

impl AchievementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from persisted records. Duplicate records for the
    /// same achievement keep the first occurrence.
    pub fn from_records(records: Vec<AchievementRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            if ledger.unlocked.insert(record.achievement) {
                ledger.records.push(record);
            }
        }
        ledger
    }

    /// Evaluate every rule and unlock the newly satisfied ones.
    ///
    /// Returns only the achievements unlocked by *this* call; a second call
    /// with identical inputs returns an empty list.
    pub fn evaluate(
        &mut self,
        stats: &DailyStat,
        sessions: &[Session],
        now: DateTime<Utc>,
    ) -> Vec<Achievement> {
        let mut newly_unlocked = Vec::new();
        for achievement in Achievement::ALL {
            if self.unlocked.contains(&achievement) {
                continue;
            }
            if achievement.satisfied(stats, sessions) {
                self.unlocked.insert(achievement);
                self.records.push(AchievementRecord {
                    achievement,
                    unlocked_at: now,
                    shared: false,
                });
                log::info!("achievement unlocked: {}", achievement.display_name());
                newly_unlocked.push(achievement);
            }
        }
        newly_unlocked
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    /// Flip the shared flag on an unlocked achievement. Returns whether a
    /// record was found.
    pub fn mark_shared(&mut self, achievement: Achievement) -> bool {
        for record in &mut self.records {
            if record.achievement == achievement {
                record.shared = true;
                return true;
            }
        }
        false
    }

    pub fn records(&self) -> &[AchievementRecord] {
        &self.records
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn total(&self) -> usize {
        Achievement::ALL.len()
    }

    /// Fraction of achievements unlocked.
    pub fn progress(&self) -> f64 {
        self.unlocked_count() as f64 / self.total() as f64
    }

    pub fn positive(&self) -> Vec<Achievement> {
        self.records
            .iter()
            .map(|r| r.achievement)
            .filter(|a| a.is_positive())
            .collect()
    }

    pub fn sarcastic(&self) -> Vec<Achievement> {
        self.records
            .iter()
            .map(|r| r.achievement)
            .filter(|a| !a.is_positive())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::InterventionMode;
    use chrono::{Duration, NaiveDate, TimeZone};
    use uuid::Uuid;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 4, 14, 0, 0).unwrap()
    }

    fn make_session(offset_mins: i64, interrupted: bool, ignored: bool) -> Session {
        Session {
            id: Uuid::new_v4(),
            start_time: base_time() + Duration::minutes(offset_mins),
            end_time: None,
            app_id: "com.example.feed".to_string(),
            duration_secs: 600,
            scroll_events: 100,
            interactions: 0,
            app_switches: 0,
            avg_scroll_velocity: 120.0,
            was_interrupted: interrupted,
            was_ignored: ignored,
            user_response: None,
            note: None,
            message_shown: None,
            intervention_mode: InterventionMode::Gentle,
        }
    }

    fn stats_with_streak(streak: u32) -> DailyStat {
        let mut stats = DailyStat::new(NaiveDate::from_ymd_opt(2025, 11, 4).unwrap());
        stats.current_streak = streak;
        stats
    }

    #[test]
    fn streak_rules_unlock_in_order() {
        let mut ledger = AchievementLedger::new();
        let unlocked = ledger.evaluate(&stats_with_streak(7), &[], base_time());
        assert_eq!(
            unlocked,
            vec![Achievement::TouchGrass, Achievement::WeekWarrior]
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut ledger = AchievementLedger::new();
        let stats = stats_with_streak(7);
        let first = ledger.evaluate(&stats, &[], base_time());
        assert_eq!(first.len(), 2);
        let second = ledger.evaluate(&stats, &[], base_time());
        assert!(second.is_empty());
        assert_eq!(ledger.unlocked_count(), 2);
    }

    #[test]
    fn reformed_needs_streak_and_low_doom_time() {
        let mut ledger = AchievementLedger::new();
        let mut stats = stats_with_streak(30);
        stats.doom_scroll_time_secs = 2000;
        let unlocked = ledger.evaluate(&stats, &[], base_time());
        assert!(!unlocked.contains(&Achievement::Reformed));
        assert!(unlocked.contains(&Achievement::MonthClean));

        let mut ledger = AchievementLedger::new();
        stats.doom_scroll_time_secs = 1000;
        let unlocked = ledger.evaluate(&stats, &[], base_time());
        assert!(unlocked.contains(&Achievement::Reformed));
    }

    #[test]
    fn doom_lord_at_ten_hours() {
        let mut ledger = AchievementLedger::new();
        let mut stats = stats_with_streak(0);
        stats.doom_scroll_time_secs = 36_000;
        stats.percentile_rank = 50;
        let unlocked = ledger.evaluate(&stats, &[], base_time());
        assert_eq!(unlocked, vec![Achievement::DoomLord]);
    }

    #[test]
    fn night_owl_requires_exact_hour() {
        let mut ledger = AchievementLedger::new();
        let mut session = make_session(0, false, false);
        session.start_time = Utc.with_ymd_and_hms(2025, 11, 4, 3, 30, 0).unwrap();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &[session.clone()], base_time());
        assert!(unlocked.contains(&Achievement::NightOwl));

        let mut ledger = AchievementLedger::new();
        session.start_time = Utc.with_ymd_and_hms(2025, 11, 4, 4, 0, 0).unwrap();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &[session], base_time());
        assert!(!unlocked.contains(&Achievement::NightOwl));
    }

    #[test]
    fn serial_scroller_counts_all_ignores() {
        let sessions: Vec<Session> = (0..50).map(|i| make_session(i, false, true)).collect();
        let mut ledger = AchievementLedger::new();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &sessions, base_time());
        assert!(unlocked.contains(&Achievement::SerialScroller));
    }

    #[test]
    fn addict_matches_app_marker() {
        let sessions: Vec<Session> = (0..100)
            .map(|i| {
                let mut s = make_session(i, false, false);
                s.app_id = "com.example.TikTok".to_string();
                s
            })
            .collect();
        let mut ledger = AchievementLedger::new();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &sessions, base_time());
        assert!(unlocked.contains(&Achievement::Addict));
    }

    #[test]
    fn ignorant_run_resets_on_interruption() {
        // 9 ignored, 1 interrupted, 10 ignored -> the second run reaches 10.
        let mut sessions: Vec<Session> = (0..9).map(|i| make_session(i, false, true)).collect();
        sessions.push(make_session(9, true, false));
        sessions.extend((10..20).map(|i| make_session(i, false, true)));

        let mut ledger = AchievementLedger::new();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &sessions, base_time());
        assert!(unlocked.contains(&Achievement::Ignorant));
    }

    #[test]
    fn ignorant_short_runs_do_not_unlock() {
        // 5 ignored, 1 interrupted, 5 ignored -> no run reaches 10.
        let mut sessions: Vec<Session> = (0..5).map(|i| make_session(i, false, true)).collect();
        sessions.push(make_session(5, true, false));
        sessions.extend((6..11).map(|i| make_session(i, false, true)));

        let mut ledger = AchievementLedger::new();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &sessions, base_time());
        assert!(!unlocked.contains(&Achievement::Ignorant));
    }

    #[test]
    fn ignorant_neutral_sessions_do_not_reset() {
        // Neither-flag sessions interleaved with ignores keep the run alive.
        let mut sessions = Vec::new();
        for i in 0..10 {
            sessions.push(make_session(i * 2, false, true));
            sessions.push(make_session(i * 2 + 1, false, false));
        }
        let mut ledger = AchievementLedger::new();
        let unlocked = ledger.evaluate(&stats_with_streak(0), &sessions, base_time());
        assert!(unlocked.contains(&Achievement::Ignorant));
    }

    #[test]
    fn from_records_dedups_and_guards() {
        let record = AchievementRecord {
            achievement: Achievement::TouchGrass,
            unlocked_at: base_time(),
            shared: false,
        };
        let mut ledger = AchievementLedger::from_records(vec![record.clone(), record]);
        assert_eq!(ledger.records().len(), 1);
        // Already-unlocked achievements are skipped on re-evaluation.
        let unlocked = ledger.evaluate(&stats_with_streak(1), &[], base_time());
        assert!(unlocked.is_empty());
    }

    #[test]
    fn mark_shared_flips_flag() {
        let mut ledger = AchievementLedger::new();
        ledger.evaluate(&stats_with_streak(1), &[], base_time());
        assert!(ledger.mark_shared(Achievement::TouchGrass));
        assert!(ledger.records()[0].shared);
        assert!(!ledger.mark_shared(Achievement::StreakMaster));
    }

    #[test]
    fn partitions_and_progress() {
        let mut ledger = AchievementLedger::new();
        let mut stats = stats_with_streak(1);
        stats.doom_scroll_time_secs = 40_000;
        ledger.evaluate(&stats, &[], base_time());
        assert_eq!(ledger.positive(), vec![Achievement::TouchGrass]);
        assert_eq!(ledger.sarcastic(), vec![Achievement::DoomLord]);
        assert!((ledger.progress() - 2.0 / 11.0).abs() < 1e-9);
    }
}
