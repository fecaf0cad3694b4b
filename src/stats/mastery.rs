use crate::session::attempt::{ALL_OPERATIONS, Attempt, Operation};

/// Digit tiers shown on the mastery grid.
pub const DIGIT_TIERS: [u8; 3] = [1, 2, 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MasteryLevel {
    Novice,
    Apprentice,
    Pro,
    Master,
}

impl MasteryLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MasteryLevel::Novice => "Novice",
            MasteryLevel::Apprentice => "Apprentice",
            MasteryLevel::Pro => "Pro",
            MasteryLevel::Master => "Master",
        }
    }
}

/// Threshold lookup. Accuracy gates are inclusive, speed gates strict:
/// a cell at exactly 3.0s avg is not Master.
pub fn level_for(accuracy: f64, avg_speed: f64) -> MasteryLevel {
    if accuracy >= 90.0 && avg_speed < 3.0 {
        MasteryLevel::Master
    } else if accuracy >= 80.0 && avg_speed < 5.0 {
        MasteryLevel::Pro
    } else if accuracy >= 70.0 {
        MasteryLevel::Apprentice
    } else {
        MasteryLevel::Novice
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MasteryCell {
    pub operation: Operation,
    pub digits: u8,
    pub level: MasteryLevel,
    pub accuracy: f64,
    pub avg_speed: f64,
    pub count: usize,
}

/// One cell per (operation, digit tier) pair, in operation-major order.
/// Pairs with no attempts show up as empty Novice cells so the grid is
/// always fully populated.
pub fn mastery_grid(attempts: &[Attempt]) -> Vec<MasteryCell> {
    let mut cells = Vec::with_capacity(ALL_OPERATIONS.len() * DIGIT_TIERS.len());
    for operation in ALL_OPERATIONS {
        for digits in DIGIT_TIERS {
            let matching: Vec<&Attempt> = attempts
                .iter()
                .filter(|a| a.operation == operation && a.digits == digits)
                .collect();
            let count = matching.len();
            let (accuracy, avg_speed) = if count == 0 {
                (0.0, 0.0)
            } else {
                let correct = matching.iter().filter(|a| a.correct).count();
                let time_sum: f64 = matching.iter().map(|a| a.time_taken).sum();
                (
                    correct as f64 / count as f64 * 100.0,
                    time_sum / count as f64,
                )
            };
            let level = if count == 0 {
                MasteryLevel::Novice
            } else {
                level_for(accuracy, avg_speed)
            };
            cells.push(MasteryCell {
                operation,
                digits,
                level,
                accuracy,
                avg_speed,
                count,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::attempt::Operation;
    use crate::stats::aggregate::test_support::attempt_on;
    use chrono::NaiveDate;

    #[test]
    fn test_master_requires_both_gates() {
        assert_eq!(level_for(90.0, 2.9), MasteryLevel::Master);
        assert_eq!(level_for(95.0, 3.0), MasteryLevel::Pro); // speed gate is strict
        assert_eq!(level_for(89.9, 2.0), MasteryLevel::Pro);
    }

    #[test]
    fn test_failed_pro_speed_gate_falls_to_apprentice() {
        assert_eq!(level_for(81.0, 5.5), MasteryLevel::Apprentice);
        assert_eq!(level_for(81.0, 5.0), MasteryLevel::Apprentice);
        assert_eq!(level_for(81.0, 4.9), MasteryLevel::Pro);
    }

    #[test]
    fn test_low_accuracy_is_novice() {
        assert_eq!(level_for(69.9, 1.0), MasteryLevel::Novice);
        assert_eq!(level_for(70.0, 100.0), MasteryLevel::Apprentice);
    }

    #[test]
    fn test_grid_always_fully_populated() {
        let grid = mastery_grid(&[]);
        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|c| c.level == MasteryLevel::Novice));
        assert!(grid.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_grid_cell_aggregates_matching_attempts() {
        let d = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let attempts = vec![
            attempt_on(d, Operation::Addition, true, 2.0),
            attempt_on(d, Operation::Addition, true, 2.0),
            attempt_on(d, Operation::Subtraction, false, 9.0),
        ];
        let grid = mastery_grid(&attempts);
        let cell = grid
            .iter()
            .find(|c| c.operation == Operation::Addition && c.digits == 1)
            .unwrap();
        assert_eq!(cell.count, 2);
        assert_eq!(cell.accuracy, 100.0);
        assert_eq!(cell.level, MasteryLevel::Master);

        let sub = grid
            .iter()
            .find(|c| c.operation == Operation::Subtraction && c.digits == 1)
            .unwrap();
        assert_eq!(sub.level, MasteryLevel::Novice);
    }
}
