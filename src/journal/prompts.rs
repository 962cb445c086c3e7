//! Default daily prompt cards
//!
//! When enabled in the journal settings, the system seeds one card per
//! day asking which day of the week the date fell on. The toggle is
//! passed in explicitly; this module never reads ambient settings.

use chrono::{DateTime, NaiveDate, Utc};

use super::models::{Card, CardKind, JournalSettings};

/// Prompt text for the daily default card, e.g.
/// "What day of the week was August 23, 2026?"
pub fn daily_prompt_question(date: NaiveDate) -> String {
    format!("What day of the week was {}?", date.format("%B %-d, %Y"))
}

/// Build today's default card, or None when disabled or already
/// present among `existing`
pub fn build_daily_card(
    settings: &JournalSettings,
    today: NaiveDate,
    now: DateTime<Utc>,
    existing: &[Card],
) -> Option<Card> {
    if !settings.create_default_cards {
        return None;
    }

    let question = daily_prompt_question(today);
    let already_exists = existing
        .iter()
        .any(|c| c.kind == CardKind::Default && c.prompt_question == question);
    if already_exists {
        return None;
    }

    let answer = today.format("%A").to_string();
    Some(Card::new(question, answer, today, CardKind::Default, now))
}
