//! The persistence collaborator seam.
//!
//! The engine reads from and writes to a generic record store it does not
//! implement. Everything here is synchronous: the engine computes its full
//! result before handing it off, so a slow or failing store never corrupts
//! in-memory state. [`MemoryStore`] is the reference implementation used in
//! tests and by hosts that persist elsewhere.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::achievements::AchievementRecord;
use crate::session::Session;
use crate::stats::DailyStat;
use crate::timectx;

/// Errors surfaced by a store implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Storage collaborator for sessions, daily stats, and achievement records.
///
/// Implementations own durability and retries; the engine treats every call
/// as a synchronous external operation and propagates failures unchanged.
pub trait RecordStore {
    /// Persist one closed session.
    fn save_session(&mut self, session: &Session) -> Result<(), StoreError>;

    /// All sessions whose start time falls on `day`.
    fn sessions_on(&self, day: NaiveDate) -> Result<Vec<Session>, StoreError>;

    /// Every stored session, in insertion order.
    fn all_sessions(&self) -> Result<Vec<Session>, StoreError>;

    /// Insert or replace the stat row for its date.
    fn save_daily_stat(&mut self, stat: &DailyStat) -> Result<(), StoreError>;

    /// The stat row for `day`, if one exists.
    fn daily_stat(&self, day: NaiveDate) -> Result<Option<DailyStat>, StoreError>;

    /// Every stored daily stat, ordered by date.
    fn stats_history(&self) -> Result<Vec<DailyStat>, StoreError>;

    /// Replace the achievement records with the ledger's current set.
    fn save_achievements(&mut self, records: &[AchievementRecord]) -> Result<(), StoreError>;

    /// Every persisted achievement record.
    fn achievements(&self) -> Result<Vec<AchievementRecord>, StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Vec<Session>,
    stats: BTreeMap<NaiveDate, DailyStat>,
    achievements: Vec<AchievementRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn save_session(&mut self, session: &Session) -> Result<(), StoreError> {
        self.sessions.push(session.clone());
        Ok(())
    }

    fn sessions_on(&self, day: NaiveDate) -> Result<Vec<Session>, StoreError> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| timectx::day_of(s.start_time) == day)
            .cloned()
            .collect())
    }

    fn all_sessions(&self) -> Result<Vec<Session>, StoreError> {
        Ok(self.sessions.clone())
    }

    fn save_daily_stat(&mut self, stat: &DailyStat) -> Result<(), StoreError> {
        self.stats.insert(stat.date, stat.clone());
        Ok(())
    }

    fn daily_stat(&self, day: NaiveDate) -> Result<Option<DailyStat>, StoreError> {
        Ok(self.stats.get(&day).cloned())
    }

    fn stats_history(&self) -> Result<Vec<DailyStat>, StoreError> {
        Ok(self.stats.values().cloned().collect())
    }

    fn save_achievements(&mut self, records: &[AchievementRecord]) -> Result<(), StoreError> {
        self.achievements = records.to_vec();
        Ok(())
    }

    fn achievements(&self) -> Result<Vec<AchievementRecord>, StoreError> {
        Ok(self.achievements.clone())
    }
}
