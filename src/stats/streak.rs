use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::session::attempt::Attempt;

/// Consecutive practice days. After a full recomputation `best >= current`
/// always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

/// Distinct local dates with at least one attempt. Attempts without a valid
/// timestamp do not contribute.
pub fn active_dates(attempts: &[Attempt]) -> BTreeSet<NaiveDate> {
    attempts.iter().filter_map(|a| a.local_date()).collect()
}

/// Current streak counts the consecutive-day run ending today or yesterday
/// (a run that ended yesterday is still alive until midnight). Best is the
/// longest consecutive run anywhere in the set.
pub fn streaks(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Streak {
    if dates.is_empty() {
        return Streak::default();
    }

    let yesterday = today - Duration::days(1);
    let anchor = if dates.contains(&today) {
        Some(today)
    } else if dates.contains(&yesterday) {
        Some(yesterday)
    } else {
        None
    };

    let mut current = 0u32;
    if let Some(mut day) = anchor {
        while dates.contains(&day) {
            current += 1;
            day -= Duration::days(1);
        }
    }

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &date in dates {
        run = match prev {
            Some(p) if date - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }

    Streak {
        current,
        best: best.max(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(days_ago: &[i64], today: NaiveDate) -> BTreeSet<NaiveDate> {
        days_ago.iter().map(|&d| today - Duration::days(d)).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    #[test]
    fn test_empty_set_is_zero() {
        assert_eq!(streaks(&BTreeSet::new(), today()), Streak::default());
    }

    #[test]
    fn test_three_consecutive_days_ending_today() {
        let streak = streaks(&set(&[0, 1, 2], today()), today());
        assert_eq!(streak, Streak { current: 3, best: 3 });
    }

    #[test]
    fn test_gap_breaks_current_streak() {
        let streak = streaks(&set(&[0, 3], today()), today());
        assert_eq!(streak, Streak { current: 1, best: 1 });
    }

    #[test]
    fn test_streak_ending_yesterday_still_counts() {
        let streak = streaks(&set(&[1, 2, 3], today()), today());
        assert_eq!(streak.current, 3);
        assert_eq!(streak.best, 3);
    }

    #[test]
    fn test_stale_streak_resets_current_but_keeps_best() {
        let streak = streaks(&set(&[5, 6, 7, 8], today()), today());
        assert_eq!(streak.current, 0);
        assert_eq!(streak.best, 4);
    }

    #[test]
    fn test_best_is_longest_run_not_latest() {
        // Run of 5 in the past, run of 2 ending today.
        let streak = streaks(&set(&[0, 1, 10, 11, 12, 13, 14], today()), today());
        assert_eq!(streak.current, 2);
        assert_eq!(streak.best, 5);
    }

    #[test]
    fn test_best_never_below_current() {
        let streak = streaks(&set(&[0, 1, 2, 3], today()), today());
        assert!(streak.best >= streak.current);
    }
}
