//! Scroll sessions and the live session tracker.

mod model;
mod tracker;

pub use model::{ResponseType, Session};
pub use tracker::{ActiveSession, SessionTracker};
