//! Spaced-repetition scheduling
//!
//! The scheduler is a pure function of (card, grade, review instant,
//! parameters). It never touches storage; persisting the returned card
//! is the caller's responsibility, and the caller must not advance
//! session state until that write succeeds.

mod algorithm;
mod params;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::journal::models::CardState;

pub use algorithm::{format_interval, forgetting_curve, preview_intervals, schedule};
pub use params::{SchedulerParams, DECAY, DEFAULT_WEIGHTS, FACTOR};

#[derive(Error, Debug, PartialEq)]
pub enum SchedulerError {
    /// Rating outside the closed 1-4 set. Caller contract violation;
    /// never coerced to a default grade.
    #[error("Invalid review grade: {0} (expected 1-4)")]
    InvalidGrade(u8),

    /// Card scheduling fields violate their invariants. Indicates
    /// upstream data corruption; surfaced rather than repaired.
    #[error("Corrupt card state: {0}")]
    CorruptCard(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Review outcome grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Numeric rating as shown on the review buttons (1-4)
    pub fn rating(self) -> u8 {
        match self {
            Grade::Again => 1,
            Grade::Hard => 2,
            Grade::Good => 3,
            Grade::Easy => 4,
        }
    }

    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];
}

impl TryFrom<u8> for Grade {
    type Error = SchedulerError;

    fn try_from(rating: u8) -> Result<Self> {
        match rating {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            other => Err(SchedulerError::InvalidGrade(other)),
        }
    }
}

/// Record of a single review, produced alongside the rescheduled card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub id: Uuid,
    pub card_id: Uuid,
    pub grade: Grade,
    pub previous_state: CardState,
    pub new_state: CardState,
    pub previous_due: DateTime<Utc>,
    pub new_due: DateTime<Utc>,
    /// Actual days since the previous review (0 for a first review)
    pub elapsed_days: i64,
    /// Newly scheduled interval in days (0 for minute-scale steps)
    pub scheduled_days: i64,
    /// Stability after the review
    pub stability: f64,
    /// Difficulty after the review
    pub difficulty: f64,
    /// Modeled recall probability at the review instant; None for a
    /// first review, where no forgetting curve exists yet
    pub retrievability: Option<f64>,
    pub reviewed_at: DateTime<Utc>,
}
