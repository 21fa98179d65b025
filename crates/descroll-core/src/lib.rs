//! # Descroll Core Library
//!
//! This library provides the core logic for Descroll, a personal
//! behavior-intervention engine: it classifies doom-scrolling from raw usage
//! telemetry, scores each day, tracks streaks, drives escalating
//! interventions, selects contextual messages, and unlocks achievements.
//! Hosts (a mobile shell, a desktop agent) are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Session tracking**: telemetry events accumulate into one in-progress
//!   session, frozen into an immutable record on stop
//! - **Detection**: pure threshold gates over session metrics, plus a live
//!   0-10 severity estimate
//! - **Scoring**: a canonical per-day doom score and a backward streak walk
//!   over persisted daily stats
//! - **Interventions**: a per-occurrence state machine (gentle /
//!   accountability / lockdown) ticked by the host or by a cancellable
//!   background driver
//! - **Messages**: weighted stochastic selection with deterministic context
//!   overrides, reproducible under a fixed seed
//! - **Achievements**: an ordered, idempotent rule set over stats and
//!   session history
//!
//! Persistence is a collaborator behind [`RecordStore`]; the engine performs
//! no I/O of its own.
//!
//! ## Key Components
//!
//! - [`Engine`]: facade wiring the full data flow
//! - [`SessionTracker`]: telemetry accumulation
//! - [`InterventionOccurrence`]: the intervention state machine
//! - [`MessageSelector`]: contextual message selection
//! - [`AchievementLedger`]: unlock evaluation and records

pub mod achievements;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod intervention;
pub mod messages;
pub mod session;
pub mod stats;
pub mod store;
pub mod timectx;

pub use achievements::{Achievement, AchievementLedger, AchievementRecord};
pub use config::Settings;
pub use detect::{is_doom_scrolling, live_severity, DetectionThresholds, ScrollMetrics};
pub use engine::{DayRollup, Engine};
pub use error::{ConfigError, CoreError, Result, StateError, ValidationError};
pub use intervention::{
    CountdownDriver, DismissOutcome, InterventionConfig, InterventionEvent, InterventionMode,
    InterventionOccurrence, LockdownChallenge, Phase,
};
pub use messages::{MessageContext, MessageSelector, MessageStyle};
pub use session::{ActiveSession, ResponseType, Session, SessionTracker};
pub use stats::{compute_daily_score, compute_streak, DailyStat, StreakSummary};
pub use store::{MemoryStore, RecordStore, StoreError};
