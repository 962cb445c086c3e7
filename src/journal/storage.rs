//! Storage operations for journal cards
//!
//! Directory structure:
//! ```text
//! <data>/mneme/
//! ├── settings.json        # JournalSettings
//! └── cards/
//!     └── {card-id}.json   # One card per file, content + memory state
//! ```
//!
//! Card writes go through a temp file and rename, so a failed write
//! leaves the previous state intact and a failed grading attempt can
//! simply be retried.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::scheduler::{self, Grade, ReviewLog, SchedulerError, SchedulerParams};

use super::models::{Card, CardState, JournalSettings, ReviewStats};
use super::prompts::build_daily_card;
use super::streak::day_streak;

#[derive(Error, Debug)]
pub enum JournalStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

pub type Result<T> = std::result::Result<T, JournalStorageError>;

/// Storage manager for journal cards and settings
pub struct JournalStorage {
    base_path: PathBuf,
}

impl JournalStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Default data directory, e.g. ~/.local/share/mneme
    pub fn default_data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("mneme"))
    }

    fn cards_dir(&self) -> PathBuf {
        self.base_path.join("cards")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn settings_path(&self) -> PathBuf {
        self.base_path.join("settings.json")
    }

    /// Create the storage directories if they don't exist
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;
        Ok(())
    }

    // ==================== Card Operations ====================

    /// Persist a card (atomic upsert: temp file + rename)
    pub fn save_card(&self, card: &Card) -> Result<()> {
        let path = self.card_path(card.id);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(card)?)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load a specific card
    pub fn get_card(&self, card_id: Uuid) -> Result<Card> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(JournalStorageError::CardNotFound(card_id));
        }
        let content = fs::read_to_string(&path)?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Delete a card
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(JournalStorageError::CardNotFound(card_id));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// List all cards, newest entry date first. Unreadable card files
    /// are logged and skipped rather than failing the whole listing.
    pub fn list_cards(&self) -> Result<Vec<Card>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<Card>(&content) {
                    Ok(card) => cards.push(card),
                    Err(e) => {
                        log::warn!("Skipping unreadable card file {:?}: {}", path, e);
                    }
                }
            }
        }

        cards.sort_by(|a, b| b.entry_date.cmp(&a.entry_date).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }

    // ==================== Review Operations ====================

    /// Grade a card: load, reschedule, persist, return the new state
    /// and the review log. The stored card only changes if the write
    /// succeeds, so the review is atomic from the caller's view.
    ///
    /// `now` must be the wall-clock review instant, also for cards
    /// pulled forward by a review-ahead session.
    pub fn submit_review(
        &self,
        card_id: Uuid,
        grade: Grade,
        now: DateTime<Utc>,
        params: &SchedulerParams,
    ) -> Result<(Card, ReviewLog)> {
        let card = self.get_card(card_id)?;
        let (next, log) = scheduler::schedule(&card, grade, now, params)?;
        self.save_card(&next)?;
        Ok((next, log))
    }

    /// Journal-wide statistics for the home screen
    pub fn review_stats(&self, now: DateTime<Utc>) -> Result<ReviewStats> {
        let cards = self.list_cards()?;

        let mut stats = ReviewStats {
            total_cards: cards.len(),
            ..Default::default()
        };
        for card in &cards {
            match card.state {
                CardState::New => stats.new_cards += 1,
                CardState::Learning => stats.learning_cards += 1,
                CardState::Review => stats.review_cards += 1,
                CardState::Relearning => stats.relearning_cards += 1,
            }
            if card.is_due(now) {
                stats.due_cards += 1;
            }
        }
        stats.streak_days = day_streak(cards.iter().map(|c| c.entry_date));

        Ok(stats)
    }

    // ==================== Settings & Daily Card ====================

    /// Load settings, falling back to defaults when absent
    pub fn load_settings(&self) -> Result<JournalSettings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(JournalSettings::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_settings(&self, settings: &JournalSettings) -> Result<()> {
        fs::write(
            self.settings_path(),
            serde_json::to_string_pretty(settings)?,
        )?;
        Ok(())
    }

    /// Create today's default prompt card if the settings allow it and
    /// it doesn't exist yet. Returns the created card, if any.
    pub fn create_daily_card(
        &self,
        settings: &JournalSettings,
        now: DateTime<Utc>,
    ) -> Result<Option<Card>> {
        let existing = self.list_cards()?;
        match build_daily_card(settings, now.date_naive(), now, &existing) {
            Some(card) => {
                self.save_card(&card)?;
                log::info!("Created daily prompt card for {}", card.entry_date);
                Ok(Some(card))
            }
            None => Ok(None),
        }
    }
}
