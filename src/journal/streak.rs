//! Day-streak calculation over journal entry dates

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

/// Count consecutive calendar days with at least one entry, ending at
/// the most recent entry day. Multiple entries on the same day count
/// once; the first gap larger than one day stops the walk.
pub fn day_streak<I>(entry_days: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = entry_days.into_iter().collect();
    let mut rev = days.iter().rev();
    let Some(mut prev) = rev.next().copied() else {
        return 0;
    };

    let mut streak = 1;
    for &day in rev {
        if prev.pred_opt() == Some(day) {
            streak += 1;
            prev = day;
        } else {
            break;
        }
    }
    streak
}

/// Streak over raw entry timestamps, normalized to UTC calendar days
/// so the result does not drift with the local timezone
pub fn day_streak_utc(entry_times: &[DateTime<Utc>]) -> u32 {
    day_streak(entry_times.iter().map(|t| t.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        Utc::now().date_naive() - Duration::days(offset)
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(day_streak(Vec::new()), 0);
    }

    #[test]
    fn test_three_consecutive_days() {
        assert_eq!(day_streak(vec![day(0), day(1), day(2)]), 3);
    }

    #[test]
    fn test_gap_breaks_streak() {
        assert_eq!(day_streak(vec![day(0), day(2)]), 1);
    }

    #[test]
    fn test_duplicate_days_collapse() {
        assert_eq!(day_streak(vec![day(0), day(0), day(1)]), 2);
    }

    #[test]
    fn test_anchored_at_most_recent_entry_day() {
        // No entry today; the streak counts back from yesterday
        assert_eq!(day_streak(vec![day(1), day(2), day(3), day(5)]), 3);
    }

    #[test]
    fn test_unsorted_input() {
        assert_eq!(day_streak(vec![day(2), day(0), day(1)]), 3);
    }

    #[test]
    fn test_timestamps_collapse_to_utc_days() {
        let midnight = Utc::now()
            .date_naive()
            .and_hms_opt(0, 30, 0)
            .unwrap()
            .and_utc();
        let times = vec![
            midnight,
            midnight + Duration::hours(20), // same UTC day
            midnight - Duration::days(1),
        ];
        assert_eq!(day_streak_utc(&times), 2);
    }
}
