//! Pure fold functions over the attempt log. No I/O, no clock access: callers
//! pass `today` where date-relative windows are involved so results are
//! deterministic under test.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::session::attempt::{Attempt, Operation};

/// Percentage of correct attempts; 0.0 for an empty slice.
pub fn accuracy(attempts: &[Attempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    let correct = attempts.iter().filter(|a| a.correct).count();
    correct as f64 / attempts.len() as f64 * 100.0
}

/// Mean answer time in seconds; 0.0 for an empty slice.
pub fn average_time(attempts: &[Attempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    attempts.iter().map(|a| a.time_taken).sum::<f64>() / attempts.len() as f64
}

/// One operation's partition of the log, in insertion order.
pub struct OperationGroup<'a> {
    pub operation: Operation,
    pub attempts: Vec<&'a Attempt>,
}

/// Partition by operation. Group order follows first appearance in the input,
/// record order within each group follows the input. Every record lands in
/// exactly one group.
pub fn group_by_operation(attempts: &[Attempt]) -> Vec<OperationGroup<'_>> {
    let mut groups: Vec<OperationGroup> = Vec::new();
    for attempt in attempts {
        match groups.iter_mut().find(|g| g.operation == attempt.operation) {
            Some(group) => group.attempts.push(attempt),
            None => groups.push(OperationGroup {
                operation: attempt.operation,
                attempts: vec![attempt],
            }),
        }
    }
    groups
}

#[derive(Clone, Debug, PartialEq)]
pub struct OperationStats {
    pub operation: Operation,
    pub count: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_time: f64,
}

/// Per-operation roll-up, sorted by attempt count descending.
pub fn operation_breakdown(attempts: &[Attempt]) -> Vec<OperationStats> {
    let mut breakdown: Vec<OperationStats> = group_by_operation(attempts)
        .into_iter()
        .map(|group| {
            let count = group.attempts.len();
            let correct = group.attempts.iter().filter(|a| a.correct).count();
            let time_sum: f64 = group.attempts.iter().map(|a| a.time_taken).sum();
            OperationStats {
                operation: group.operation,
                count,
                correct,
                accuracy: correct as f64 / count as f64 * 100.0,
                avg_time: time_sum / count as f64,
            }
        })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    breakdown
}

/// Derived per-day aggregate. Recomputed on every view; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DailyBucket {
    pub count: usize,
    pub correct: usize,
    pub time_sum: f64,
}

impl DailyBucket {
    pub fn accuracy(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.correct as f64 / self.count as f64 * 100.0
        }
    }

    pub fn avg_time(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.time_sum / self.count as f64
        }
    }
}

/// Group by local calendar date. Attempts without a parseable timestamp are
/// skipped silently.
pub fn daily_buckets(attempts: &[Attempt]) -> BTreeMap<NaiveDate, DailyBucket> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();
    for attempt in attempts {
        let Some(date) = attempt.local_date() else {
            continue;
        };
        let bucket = buckets.entry(date).or_default();
        bucket.count += 1;
        if attempt.correct {
            bucket.correct += 1;
        }
        bucket.time_sum += attempt.time_taken;
    }
    buckets
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeriodStats {
    pub attempts: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_time: f64,
    pub total_time: f64,
}

fn period_stats<'a>(attempts: impl Iterator<Item = &'a Attempt>) -> PeriodStats {
    let mut stats = PeriodStats::default();
    for attempt in attempts {
        stats.attempts += 1;
        if attempt.correct {
            stats.correct += 1;
        }
        stats.total_time += attempt.time_taken;
    }
    if stats.attempts > 0 {
        stats.accuracy = stats.correct as f64 / stats.attempts as f64 * 100.0;
        stats.avg_time = stats.total_time / stats.attempts as f64;
    }
    stats
}

pub fn today_stats(attempts: &[Attempt], today: NaiveDate) -> PeriodStats {
    period_stats(attempts.iter().filter(|a| a.local_date() == Some(today)))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverallStats {
    pub totals: PeriodStats,
    pub unique_days: usize,
}

pub fn overall_stats(attempts: &[Attempt]) -> OverallStats {
    OverallStats {
        totals: period_stats(attempts.iter()),
        unique_days: daily_buckets(attempts).len(),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeeklyStats {
    pub totals: PeriodStats,
    /// Ascending by date; only days with activity appear.
    pub daily: Vec<(NaiveDate, DailyBucket)>,
}

/// Last seven days including today.
pub fn weekly_stats(attempts: &[Attempt], today: NaiveDate) -> WeeklyStats {
    let week_start = today - Duration::days(6);
    let in_week: Vec<&Attempt> = attempts
        .iter()
        .filter(|a| {
            a.local_date()
                .is_some_and(|d| d >= week_start && d <= today)
        })
        .collect();
    let totals = period_stats(in_week.iter().copied());

    let mut daily: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();
    for attempt in &in_week {
        let Some(date) = attempt.local_date() else {
            continue;
        };
        let bucket = daily.entry(date).or_default();
        bucket.count += 1;
        if attempt.correct {
            bucket.correct += 1;
        }
        bucket.time_sum += attempt.time_taken;
    }

    WeeklyStats {
        totals,
        daily: daily.into_iter().collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DigitStats {
    pub digits: u8,
    pub count: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_time: f64,
}

/// Per digit-tier roll-up, ascending by tier.
pub fn difficulty_progression(attempts: &[Attempt]) -> Vec<DigitStats> {
    let mut per_tier: BTreeMap<u8, (usize, usize, f64)> = BTreeMap::new();
    for attempt in attempts {
        let entry = per_tier.entry(attempt.digits).or_insert((0, 0, 0.0));
        entry.0 += 1;
        if attempt.correct {
            entry.1 += 1;
        }
        entry.2 += attempt.time_taken;
    }
    per_tier
        .into_iter()
        .map(|(digits, (count, correct, time_sum))| DigitStats {
            digits,
            count,
            correct,
            accuracy: correct as f64 / count as f64 * 100.0,
            avg_time: time_sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Local, TimeZone, Utc};

    use crate::session::attempt::{Attempt, Operation};

    /// Build an attempt whose *local* calendar date is exactly `date`,
    /// regardless of the machine timezone.
    pub fn attempt_on(
        date: chrono::NaiveDate,
        operation: Operation,
        correct: bool,
        time_taken: f64,
    ) -> Attempt {
        let local = Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .unwrap();
        Attempt {
            id: 0,
            operation,
            digits: 1,
            correct,
            time_taken,
            question_text: "3 + 4".to_string(),
            user_answer: if correct { "7" } else { "6" }.to_string(),
            correct_answer: 7,
            timestamp: Some(local.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::test_support::attempt_on;
    use super::*;
    use crate::session::attempt::Operation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_accuracy_empty_is_zero() {
        assert_eq!(accuracy(&[]), 0.0);
    }

    #[test]
    fn test_accuracy_all_correct_is_hundred() {
        let d = date(2026, 5, 1);
        let attempts: Vec<Attempt> = (0..8)
            .map(|_| attempt_on(d, Operation::Addition, true, 2.0))
            .collect();
        assert_eq!(accuracy(&attempts), 100.0);
    }

    #[test]
    fn test_average_time_empty_is_zero() {
        assert_eq!(average_time(&[]), 0.0);
    }

    #[test]
    fn test_group_by_operation_conserves_records() {
        let d = date(2026, 5, 1);
        let attempts = vec![
            attempt_on(d, Operation::Addition, true, 2.0),
            attempt_on(d, Operation::Division, false, 5.0),
            attempt_on(d, Operation::Addition, false, 3.0),
            attempt_on(d, Operation::Multiplication, true, 4.0),
            attempt_on(d, Operation::Addition, true, 2.5),
        ];
        let groups = group_by_operation(&attempts);
        let total: usize = groups.iter().map(|g| g.attempts.len()).sum();
        assert_eq!(total, attempts.len());

        // Group order follows first appearance.
        let order: Vec<Operation> = groups.iter().map(|g| g.operation).collect();
        assert_eq!(
            order,
            vec![
                Operation::Addition,
                Operation::Division,
                Operation::Multiplication
            ]
        );
        // Insertion order preserved within a group.
        assert_eq!(groups[0].attempts[0].time_taken, 2.0);
        assert_eq!(groups[0].attempts[1].time_taken, 3.0);
        assert_eq!(groups[0].attempts[2].time_taken, 2.5);
    }

    #[test]
    fn test_operation_breakdown_sorted_by_count() {
        let d = date(2026, 5, 1);
        let attempts = vec![
            attempt_on(d, Operation::Division, true, 5.0),
            attempt_on(d, Operation::Addition, true, 2.0),
            attempt_on(d, Operation::Addition, false, 3.0),
        ];
        let breakdown = operation_breakdown(&attempts);
        assert_eq!(breakdown[0].operation, Operation::Addition);
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].accuracy, 50.0);
        assert_eq!(breakdown[1].operation, Operation::Division);
    }

    #[test]
    fn test_daily_buckets_skip_missing_timestamps() {
        let d = date(2026, 5, 1);
        let mut attempts = vec![
            attempt_on(d, Operation::Addition, true, 2.0),
            attempt_on(d, Operation::Addition, false, 4.0),
        ];
        let mut no_ts = attempt_on(d, Operation::Addition, true, 1.0);
        no_ts.timestamp = None;
        attempts.push(no_ts);

        let buckets = daily_buckets(&attempts);
        assert_eq!(buckets.len(), 1);
        let bucket = buckets[&d];
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.correct, 1);
        assert_eq!(bucket.accuracy(), 50.0);
        assert_eq!(bucket.avg_time(), 3.0);
    }

    #[test]
    fn test_today_stats_filters_by_date() {
        let today = date(2026, 5, 10);
        let attempts = vec![
            attempt_on(today, Operation::Addition, true, 2.0),
            attempt_on(today - chrono::Duration::days(1), Operation::Addition, true, 2.0),
        ];
        let stats = today_stats(&attempts, today);
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.accuracy, 100.0);
    }

    #[test]
    fn test_weekly_stats_window_is_seven_days() {
        let today = date(2026, 5, 10);
        let attempts = vec![
            attempt_on(today, Operation::Addition, true, 2.0),
            attempt_on(today - chrono::Duration::days(6), Operation::Addition, false, 2.0),
            attempt_on(today - chrono::Duration::days(7), Operation::Addition, true, 2.0),
        ];
        let stats = weekly_stats(&attempts, today);
        assert_eq!(stats.totals.attempts, 2);
        assert_eq!(stats.daily.len(), 2);
        assert_eq!(stats.totals.accuracy, 50.0);
    }

    #[test]
    fn test_overall_stats_counts_unique_days() {
        let attempts = vec![
            attempt_on(date(2026, 5, 1), Operation::Addition, true, 2.0),
            attempt_on(date(2026, 5, 1), Operation::Addition, true, 2.0),
            attempt_on(date(2026, 5, 3), Operation::Addition, false, 2.0),
        ];
        let stats = overall_stats(&attempts);
        assert_eq!(stats.totals.attempts, 3);
        assert_eq!(stats.unique_days, 2);
    }

    #[test]
    fn test_difficulty_progression_ascending_tiers() {
        let d = date(2026, 5, 1);
        let mut a1 = attempt_on(d, Operation::Addition, true, 2.0);
        a1.digits = 2;
        let mut a2 = attempt_on(d, Operation::Addition, false, 6.0);
        a2.digits = 1;
        let progression = difficulty_progression(&[a1, a2]);
        assert_eq!(progression.len(), 2);
        assert_eq!(progression[0].digits, 1);
        assert_eq!(progression[1].digits, 2);
        assert_eq!(progression[1].accuracy, 100.0);
    }
}
