//! Memory journal core
//!
//! Short daily journal entries become review cards, re-surfaced right
//! before the memory-strength model predicts they would be forgotten.
//!
//! - [`journal`] — card model, JSON-file persistence, daily prompt
//!   cards, and the day-streak calculator
//! - [`scheduler`] — the pure FSRS scheduling function and previews
//! - [`session`] — read-only queries composing review sessions (due,
//!   review-ahead, forgotten windows) and their count summaries
//!
//! A review is a two-step unit: `scheduler::schedule` computes the
//! next card state, then the storage write commits it. Callers must
//! not advance the session until the write succeeds.

pub mod journal;
pub mod scheduler;
pub mod session;
