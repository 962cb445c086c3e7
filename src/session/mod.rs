//! Review-session composition
//!
//! Read-only queries that select and count cards for a review session.
//! All functions take the card collection as a slice — persistence is
//! the storage layer's concern — and return cards ordered by due
//! ascending, ties broken by id, so repeated queries are identical.
//!
//! A session can pull in two extra windows beyond plain due cards:
//! "ahead" cards (scheduled within the next N days and reviewed at
//! least once) and "forgotten" cards (currently relearning after a
//! recent lapse).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::journal::models::{Card, CardState};

/// Card count for a single day offset in a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    pub days: u32,
    pub count: usize,
}

/// Breakdown of a prospective review session.
///
/// `total_cards` is the plain sum of the two windows: a relearning
/// card that is also due inside the ahead window is counted twice,
/// matching the session summary this feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounts {
    pub total_cards: usize,
    pub regular_cards: usize,
    pub forgotten_cards: usize,
}

/// Per-state card tally for the review screen header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCounts {
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub relearning: usize,
}

/// Midnight UTC of the day containing `now`
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

fn sort_session(cards: &mut [Card]) {
    cards.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.id.cmp(&b.id)));
}

/// Cards due for the default review queue: `due <= as_of + 1 day`
pub fn due_entries(cards: &[Card], as_of: DateTime<Utc>) -> Vec<Card> {
    let cutoff = as_of + Duration::days(1);
    let mut out: Vec<Card> = cards.iter().filter(|c| c.due <= cutoff).cloned().collect();
    sort_session(&mut out);
    out
}

/// Due cards plus cards scheduled within the next `days_ahead` days.
///
/// With `days_ahead == 0` this is exactly `due_entries(now)`. With a
/// positive window, never-reviewed cards are excluded — they have no
/// forward schedule to pull forward.
pub fn due_and_ahead_entries(cards: &[Card], now: DateTime<Utc>, days_ahead: u32) -> Vec<Card> {
    if days_ahead == 0 {
        return due_entries(cards, now);
    }
    let cutoff = start_of_day(now) + Duration::days(days_ahead as i64 + 1);
    let mut out: Vec<Card> = cards
        .iter()
        .filter(|c| c.due <= cutoff && c.reps >= 1)
        .cloned()
        .collect();
    sort_session(&mut out);
    out
}

/// Whether a card in the current session was pulled forward from a
/// future due date. The grading caller still passes the real
/// wall-clock instant to the scheduler for such cards.
pub fn is_ahead_card(card: &Card, now: DateTime<Utc>, days_ahead: u32) -> bool {
    days_ahead > 0 && start_of_day(card.due) > start_of_day(now) && card.reps > 0
}

/// For each day offset `d in [0, max_days]`, how many cards a session
/// pulling `d` days ahead would contain. Offset 0 includes
/// never-reviewed cards; positive offsets require `reps >= 1`. The
/// histogram is monotonically non-decreasing in `d`.
pub fn card_counts_by_day(cards: &[Card], now: DateTime<Utc>, max_days: u32) -> Vec<DayCount> {
    let today = start_of_day(now);
    (0..=max_days)
        .map(|d| {
            let cutoff = today + Duration::days(d as i64 + 1);
            let count = cards
                .iter()
                .filter(|c| c.due <= cutoff && (d == 0 || c.reps >= 1))
                .count();
            DayCount { days: d, count }
        })
        .collect()
}

/// For each day offset `d in [0, max_days]`, how many currently-lapsed
/// cards were reviewed within the last `d` days: `state == Relearning`,
/// `lapses >= 1`, `last_review >= today - d`.
pub fn forgotten_card_counts(cards: &[Card], now: DateTime<Utc>, max_days: u32) -> Vec<DayCount> {
    let today = start_of_day(now);
    (0..=max_days)
        .map(|d| {
            let floor = today - Duration::days(d as i64);
            let count = cards
                .iter()
                .filter(|c| {
                    c.state == CardState::Relearning
                        && c.lapses >= 1
                        && c.last_review.map_or(false, |lr| lr >= floor)
                })
                .count();
            DayCount { days: d, count }
        })
        .collect()
}

/// Size of a session combining the ahead window with the forgotten
/// window. `total_cards` does not deduplicate cards present in both.
pub fn session_card_count(
    cards: &[Card],
    now: DateTime<Utc>,
    days_ahead: u32,
    forgotten_days: u32,
) -> SessionCounts {
    let regular_cards = due_and_ahead_entries(cards, now, days_ahead).len();
    let floor = start_of_day(now) - Duration::days(forgotten_days as i64);
    let forgotten_cards = cards
        .iter()
        .filter(|c| {
            c.state == CardState::Relearning
                && c.lapses >= 1
                && c.last_review.map_or(false, |lr| lr >= floor)
        })
        .count();
    SessionCounts {
        total_cards: regular_cards + forgotten_cards,
        regular_cards,
        forgotten_cards,
    }
}

/// Tally session cards by memory state
pub fn state_counts(cards: &[Card]) -> StateCounts {
    let mut counts = StateCounts::default();
    for card in cards {
        match card.state {
            CardState::New => counts.new += 1,
            CardState::Learning => counts.learning += 1,
            CardState::Review => counts.review += 1,
            CardState::Relearning => counts.relearning += 1,
        }
    }
    counts
}
