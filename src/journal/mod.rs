//! Journal cards: data model, persistence, daily prompts, streaks

pub mod models;
pub mod prompts;
pub mod storage;
pub mod streak;

pub use models::{Card, CardKind, CardState, JournalSettings, ReviewStats};
pub use storage::{JournalStorage, JournalStorageError};
pub use streak::{day_streak, day_streak_utc};
