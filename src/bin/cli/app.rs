use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;

use mneme_lib::journal::{Card, JournalSettings, JournalStorage};
use mneme_lib::scheduler::SchedulerParams;

/// Shared CLI context: storage, settings, scheduler parameters
pub struct App {
    pub storage: JournalStorage,
    pub settings: JournalSettings,
    pub params: SchedulerParams,
}

impl App {
    pub fn new(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let dir = match data_dir {
            Some(dir) => dir,
            None => JournalStorage::default_data_dir()
                .context("could not resolve a data directory")?,
        };

        let storage = JournalStorage::new(dir);
        storage.init().context("failed to initialize journal storage")?;
        let settings = storage.load_settings()?;

        // Seed today's default prompt card (no-op if disabled or present)
        storage.create_daily_card(&settings, Utc::now())?;

        Ok(Self {
            storage,
            settings,
            params: SchedulerParams::default(),
        })
    }

    /// Resolve a card by id prefix
    pub fn resolve_card(&self, prefix: &str) -> anyhow::Result<Card> {
        let needle = prefix.to_lowercase();
        let cards = self.storage.list_cards()?;
        let mut matches = cards
            .into_iter()
            .filter(|c| c.id.to_string().starts_with(&needle));

        let first = matches
            .next()
            .with_context(|| format!("no card matching '{}'", prefix))?;
        if matches.next().is_some() {
            anyhow::bail!("card id prefix '{}' is ambiguous", prefix);
        }
        Ok(first)
    }
}
