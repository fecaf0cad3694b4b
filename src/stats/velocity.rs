use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::session::attempt::Attempt;

const MIN_SAMPLE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
            Trend::InsufficientData => "insufficient data",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LearningVelocity {
    /// 0.6 × improvement + 0.4 × consistency.
    pub velocity_score: f64,
    /// Accuracy delta (percentage points) between the late and early half
    /// of the window.
    pub improvement_rate: f64,
    /// 100 minus the variance of daily accuracies, floored at 0.
    pub consistency_score: f64,
    pub trend: Trend,
}

/// Learning velocity over the last `days` days ending at `today`. Needs at
/// least ten attempts in the window to say anything.
pub fn learning_velocity(attempts: &[Attempt], today: NaiveDate, days: i64) -> LearningVelocity {
    let start = today - Duration::days(days);
    let windowed: Vec<&Attempt> = attempts
        .iter()
        .filter(|a| a.local_date().is_some_and(|d| d >= start && d <= today))
        .collect();

    if windowed.len() < MIN_SAMPLE {
        return LearningVelocity {
            velocity_score: 0.0,
            improvement_rate: 0.0,
            consistency_score: 0.0,
            trend: Trend::InsufficientData,
        };
    }

    let mid = windowed.len() / 2;
    let half_accuracy = |half: &[&Attempt]| {
        half.iter().filter(|a| a.correct).count() as f64 / half.len() as f64
    };
    let improvement_rate =
        (half_accuracy(&windowed[mid..]) - half_accuracy(&windowed[..mid])) * 100.0;

    let mut per_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for attempt in &windowed {
        let Some(date) = attempt.local_date() else {
            continue;
        };
        let entry = per_day.entry(date).or_default();
        entry.0 += 1;
        if attempt.correct {
            entry.1 += 1;
        }
    }
    let daily_accuracies: Vec<f64> = per_day
        .values()
        .map(|&(total, correct)| correct as f64 / total as f64 * 100.0)
        .collect();
    let consistency_score = if daily_accuracies.is_empty() {
        0.0
    } else {
        let mean = daily_accuracies.iter().sum::<f64>() / daily_accuracies.len() as f64;
        let variance = daily_accuracies
            .iter()
            .map(|a| (a - mean).powi(2))
            .sum::<f64>()
            / daily_accuracies.len() as f64;
        (100.0 - variance).max(0.0)
    };

    let trend = if improvement_rate > 5.0 {
        Trend::Improving
    } else if improvement_rate < -5.0 {
        Trend::Declining
    } else {
        Trend::Stable
    };

    LearningVelocity {
        velocity_score: improvement_rate * 0.6 + consistency_score * 0.4,
        improvement_rate,
        consistency_score,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::attempt::Operation;
    use crate::stats::aggregate::test_support::attempt_on;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    #[test]
    fn test_insufficient_data_below_ten_attempts() {
        let attempts: Vec<_> = (0..9)
            .map(|_| attempt_on(today(), Operation::Addition, true, 2.0))
            .collect();
        let v = learning_velocity(&attempts, today(), 30);
        assert_eq!(v.trend, Trend::InsufficientData);
        assert_eq!(v.velocity_score, 0.0);
    }

    #[test]
    fn test_improving_trend() {
        // Early half mostly wrong, late half all correct.
        let mut attempts = Vec::new();
        for i in 0..10 {
            attempts.push(attempt_on(
                today() - Duration::days(9 - i),
                Operation::Addition,
                false,
                2.0,
            ));
        }
        for i in 0..10 {
            attempts.push(attempt_on(
                today() - Duration::days(4 - (i % 5)),
                Operation::Addition,
                true,
                2.0,
            ));
        }
        let v = learning_velocity(&attempts, today(), 30);
        assert_eq!(v.trend, Trend::Improving);
        assert!(v.improvement_rate > 5.0);
    }

    #[test]
    fn test_stable_trend_for_uniform_results() {
        let attempts: Vec<_> = (0..20)
            .map(|i| {
                attempt_on(
                    today() - Duration::days(i % 5),
                    Operation::Addition,
                    true,
                    2.0,
                )
            })
            .collect();
        let v = learning_velocity(&attempts, today(), 30);
        assert_eq!(v.trend, Trend::Stable);
        // Perfectly uniform days: zero variance, full consistency.
        assert_eq!(v.consistency_score, 100.0);
    }

    #[test]
    fn test_window_excludes_old_attempts() {
        let mut attempts: Vec<_> = (0..20)
            .map(|_| attempt_on(today() - Duration::days(60), Operation::Addition, false, 2.0))
            .collect();
        attempts.extend((0..5).map(|_| attempt_on(today(), Operation::Addition, true, 2.0)));
        let v = learning_velocity(&attempts, today(), 30);
        assert_eq!(v.trend, Trend::InsufficientData);
    }
}
