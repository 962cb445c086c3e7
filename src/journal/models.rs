//! Data models for journal cards and review state

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder stability for a card that has never been reviewed.
/// Replaced by the initial-rating formula on the first review.
pub const INITIAL_STABILITY: f64 = 1.0;

/// Placeholder difficulty for a never-reviewed card (mid-range)
pub const INITIAL_DIFFICULTY: f64 = 5.0;

/// Who created the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardKind {
    /// System-generated (e.g. the daily day-of-week prompt)
    Default,
    /// Authored by the user
    User,
}

impl Default for CardKind {
    fn default() -> Self {
        Self::User
    }
}

/// Memory state of a card in the spaced repetition system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardState {
    /// Never reviewed
    New,
    /// In the initial learning steps
    Learning,
    /// Regular spaced review
    Review,
    /// Lapsed and re-learning
    Relearning,
}

impl Default for CardState {
    fn default() -> Self {
        Self::New
    }
}

/// A journal entry card: the entry content together with its
/// spaced-repetition memory state. Scheduling fields are only ever
/// mutated by applying a scheduler result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    /// The review prompt shown before the answer is revealed
    pub prompt_question: String,
    /// The memory itself
    pub answer: String,
    #[serde(default)]
    pub kind: CardKind,
    /// Calendar date the memory is about (distinct from `due`)
    pub entry_date: NaiveDate,
    /// When the card next becomes eligible for review
    pub due: DateTime<Utc>,
    /// Estimated days for recall probability to decay to the target retention
    #[serde(default = "default_stability")]
    pub stability: f64,
    /// Intrinsic recall difficulty, bounded [1, 10]
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    /// Days since the previous review, recorded at the last review
    #[serde(default)]
    pub elapsed_days: i64,
    /// Interval scheduled at the last review, in days
    #[serde(default)]
    pub scheduled_days: i64,
    /// Number of reviews performed
    #[serde(default)]
    pub reps: i64,
    /// Times the card was graded Again while in Review
    #[serde(default)]
    pub lapses: i64,
    #[serde(default)]
    pub state: CardState,
    /// Instant of the most recent review, None iff `reps == 0`
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_stability() -> f64 {
    INITIAL_STABILITY
}

fn default_difficulty() -> f64 {
    INITIAL_DIFFICULTY
}

impl Card {
    pub fn new(
        prompt_question: String,
        answer: String,
        entry_date: NaiveDate,
        kind: CardKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt_question,
            answer,
            kind,
            entry_date,
            due: now,
            stability: INITIAL_STABILITY,
            difficulty: INITIAL_DIFFICULTY,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            state: CardState::New,
            last_review: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the card is due for review at `as_of`
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.due <= as_of
    }
}

/// Statistics over the whole journal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub relearning_cards: usize,
    pub due_cards: usize,
    pub streak_days: u32,
}

/// User-level journal settings, persisted as settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalSettings {
    /// Whether the system creates the daily default prompt card
    #[serde(default = "default_create_default_cards")]
    pub create_default_cards: bool,
}

fn default_create_default_cards() -> bool {
    true
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            create_default_cards: true,
        }
    }
}
