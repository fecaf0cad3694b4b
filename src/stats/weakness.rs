use std::collections::HashMap;

use crate::session::attempt::{Attempt, Operation};

const MIN_ATTEMPTS: usize = 2;
const SLOW_FACTOR: f64 = 1.5;
const ACCURACY_FLOOR: f64 = 70.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaknessReason {
    /// Answered wrong too often.
    Accuracy,
    /// Markedly slower than the overall average.
    Speed,
}

impl WeaknessReason {
    pub fn as_str(self) -> &'static str {
        match self {
            WeaknessReason::Accuracy => "accuracy",
            WeaknessReason::Speed => "speed",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeakSpot {
    pub operation: Operation,
    pub digits: u8,
    pub question_text: String,
    pub count: usize,
    pub misses: usize,
    pub accuracy: f64,
    pub avg_time: f64,
    pub reason: WeaknessReason,
}

/// Find specific questions the user struggles with: seen at least twice and
/// either below the accuracy floor or more than 1.5× slower than the overall
/// average. Sorted worst-first (lowest accuracy, then slowest).
pub fn weak_spots(attempts: &[Attempt]) -> Vec<WeakSpot> {
    if attempts.is_empty() {
        return Vec::new();
    }

    let overall_avg = {
        let sum: f64 = attempts.iter().map(|a| a.time_taken).sum();
        sum / attempts.len() as f64
    };

    let mut per_question: HashMap<(Operation, u8, &str), Vec<&Attempt>> = HashMap::new();
    for attempt in attempts {
        per_question
            .entry((attempt.operation, attempt.digits, attempt.question_text.as_str()))
            .or_default()
            .push(attempt);
    }

    let mut spots: Vec<WeakSpot> = per_question
        .into_iter()
        .filter_map(|((operation, digits, question), group)| {
            let count = group.len();
            if count < MIN_ATTEMPTS {
                return None;
            }
            let correct = group.iter().filter(|a| a.correct).count();
            let accuracy = correct as f64 / count as f64 * 100.0;
            let avg_time = group.iter().map(|a| a.time_taken).sum::<f64>() / count as f64;

            let reason = if accuracy < ACCURACY_FLOOR {
                WeaknessReason::Accuracy
            } else if avg_time > overall_avg * SLOW_FACTOR {
                WeaknessReason::Speed
            } else {
                return None;
            };

            Some(WeakSpot {
                operation,
                digits,
                question_text: question.to_string(),
                count,
                misses: count - correct,
                accuracy,
                avg_time,
                reason,
            })
        })
        .collect();

    spots.sort_by(|a, b| {
        a.accuracy
            .partial_cmp(&b.accuracy)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.avg_time
                    .partial_cmp(&a.avg_time)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    spots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::aggregate::test_support::attempt_on;
    use chrono::NaiveDate;

    fn with_question(question: &str, correct: bool, time_taken: f64) -> Attempt {
        let d = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let mut a = attempt_on(d, Operation::Multiplication, correct, time_taken);
        a.question_text = question.to_string();
        a
    }

    #[test]
    fn test_empty_log_has_no_weak_spots() {
        assert!(weak_spots(&[]).is_empty());
    }

    #[test]
    fn test_repeated_misses_flagged_for_accuracy() {
        let attempts = vec![
            with_question("7 × 8", false, 3.0),
            with_question("7 × 8", false, 3.0),
            with_question("7 × 8", true, 3.0),
            with_question("2 × 2", true, 3.0),
            with_question("2 × 2", true, 3.0),
        ];
        let spots = weak_spots(&attempts);
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].question_text, "7 × 8");
        assert_eq!(spots[0].reason, WeaknessReason::Accuracy);
        assert_eq!(spots[0].misses, 2);
    }

    #[test]
    fn test_slow_but_correct_flagged_for_speed() {
        let attempts = vec![
            with_question("9 × 6", true, 12.0),
            with_question("9 × 6", true, 12.0),
            with_question("2 × 2", true, 1.0),
            with_question("2 × 2", true, 1.0),
            with_question("3 × 3", true, 1.0),
            with_question("3 × 3", true, 1.0),
        ];
        let spots = weak_spots(&attempts);
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].question_text, "9 × 6");
        assert_eq!(spots[0].reason, WeaknessReason::Speed);
    }

    #[test]
    fn test_single_sighting_never_flagged() {
        let attempts = vec![
            with_question("7 × 8", false, 3.0),
            with_question("2 × 2", true, 3.0),
            with_question("2 × 2", true, 3.0),
        ];
        assert!(weak_spots(&attempts).is_empty());
    }

    #[test]
    fn test_sorted_worst_first() {
        let attempts = vec![
            with_question("7 × 8", false, 3.0),
            with_question("7 × 8", true, 3.0),
            with_question("6 × 9", false, 3.0),
            with_question("6 × 9", false, 3.0),
        ];
        let spots = weak_spots(&attempts);
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].question_text, "6 × 9");
    }
}
