use std::collections::BTreeMap;

use crate::session::attempt::Operation;
use crate::session::question::OperationChoice;
use crate::session::summary::SessionSummary;

pub const LEVEL_COUNT: u32 = 100;

/// A level must be fully played and hit this accuracy to count as passed.
const PASS_ACCURACY: f64 = 80.0;
const TWO_STAR_ACCURACY: f64 = 90.0;
/// Per-question total-time budget on speed-run levels.
const SPEED_SECS_PER_QUESTION: u64 = 4;
/// Tighter budget a speed run must also beat for the third star.
const THREE_STAR_SECS_PER_QUESTION: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelKind {
    Standard,
    /// Every 5th level: the whole set must finish inside a time budget.
    SpeedRun,
    /// Every 10th level: a longer set marking the end of a block.
    MasteryChallenge,
}

/// One rung of the 100-level ladder. Derived from the level number alone;
/// nothing here is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSpec {
    pub id: u32,
    pub kind: LevelKind,
    pub choice: OperationChoice,
    pub digits: u8,
    pub questions: usize,
    /// Total-time budget in seconds; set on speed runs only.
    pub time_budget: Option<u64>,
    /// Total stars across all levels needed before this one opens.
    pub required_stars: u32,
}

/// The ladder cycles through the operations, grows the digit tier every 20
/// levels, and lengthens the question set every 10.
pub fn level_spec(id: u32) -> Option<LevelSpec> {
    if id == 0 || id > LEVEL_COUNT {
        return None;
    }

    let choice = match (id - 1) % 5 {
        0 => OperationChoice::Fixed(Operation::Addition),
        1 => OperationChoice::Fixed(Operation::Subtraction),
        2 => OperationChoice::Fixed(Operation::Multiplication),
        3 => OperationChoice::Fixed(Operation::Division),
        _ => OperationChoice::Mixed,
    };
    let digits = (1 + id / 20).min(3) as u8;
    let questions = (10 + (id / 10) as usize * 2).min(30);

    let kind = if id % 10 == 0 {
        LevelKind::MasteryChallenge
    } else if id % 5 == 0 {
        LevelKind::SpeedRun
    } else {
        LevelKind::Standard
    };
    let time_budget =
        (id % 5 == 0).then(|| questions as u64 * SPEED_SECS_PER_QUESTION);

    Some(LevelSpec {
        id,
        kind,
        choice,
        digits,
        questions,
        time_budget,
        required_stars: (id - 1) * 2,
    })
}

impl LevelSpec {
    pub fn is_unlocked(&self, total_stars: u32) -> bool {
        self.id == 1 || total_stars >= self.required_stars
    }
}

/// Star rating for a finished run of this level. 0 means failed: the set was
/// left early, accuracy fell below the pass bar, or a speed run blew its
/// budget.
pub fn score_stars(spec: &LevelSpec, summary: &SessionSummary) -> u8 {
    if summary.total < spec.questions || summary.accuracy < PASS_ACCURACY {
        return 0;
    }
    if let Some(budget) = spec.time_budget
        && summary.total_time > budget as f64
    {
        return 0;
    }

    let three_star_time_ok = spec.time_budget.is_none()
        || summary.total_time <= (spec.questions as u64 * THREE_STAR_SECS_PER_QUESTION) as f64;
    if summary.accuracy >= 100.0 && three_star_time_ok {
        3
    } else if summary.accuracy >= TWO_STAR_ACCURACY {
        2
    } else {
        1
    }
}

/// Per-level best star ratings. Only passed runs are recorded, and only when
/// they beat the previous best; a fail never erases a pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelBook {
    stars: BTreeMap<u32, u8>,
}

impl LevelBook {
    pub fn from_map(stars: BTreeMap<u32, u8>) -> Self {
        Self { stars }
    }

    pub fn to_map(&self) -> BTreeMap<u32, u8> {
        self.stars.clone()
    }

    pub fn stars(&self, id: u32) -> u8 {
        self.stars.get(&id).copied().unwrap_or(0)
    }

    pub fn total_stars(&self) -> u32 {
        self.stars.values().map(|&s| s as u32).sum()
    }

    pub fn completed_levels(&self) -> usize {
        self.stars.values().filter(|&&s| s > 0).count()
    }

    pub fn is_unlocked(&self, spec: &LevelSpec) -> bool {
        spec.is_unlocked(self.total_stars())
    }

    /// Record a run; keeps the best result. Returns true when the rating
    /// improved.
    pub fn record(&mut self, id: u32, stars: u8) -> bool {
        if stars > self.stars(id) {
            self.stars.insert(id, stars.min(3));
            true
        } else {
            false
        }
    }

    /// The lowest unlocked level not yet passed; where "continue" should land.
    pub fn next_level(&self) -> u32 {
        let total = self.total_stars();
        for id in 1..=LEVEL_COUNT {
            if self.stars(id) == 0
                && level_spec(id).is_some_and(|spec| spec.is_unlocked(total))
            {
                return id;
            }
        }
        LEVEL_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary_for(spec: &LevelSpec, correct: usize, total_time: f64) -> SessionSummary {
        let total = spec.questions;
        SessionSummary {
            mode: "Drill".to_string(),
            operation: spec.choice.as_str().to_string(),
            total,
            correct,
            accuracy: correct as f64 / total as f64 * 100.0,
            avg_speed: total_time / total as f64,
            total_time,
            best_run: correct,
            mistakes: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_ladder_cycles_operations_and_grows() {
        let first = level_spec(1).unwrap();
        assert_eq!(first.choice, OperationChoice::Fixed(Operation::Addition));
        assert_eq!(first.digits, 1);
        assert_eq!(first.questions, 10);
        assert_eq!(first.required_stars, 0);

        assert_eq!(level_spec(5).unwrap().choice, OperationChoice::Mixed);
        assert_eq!(level_spec(6).unwrap().choice, OperationChoice::Fixed(Operation::Addition));

        // Digit tier caps at 3, question count at 30
        assert_eq!(level_spec(100).unwrap().digits, 3);
        assert_eq!(level_spec(100).unwrap().questions, 30);

        assert!(level_spec(0).is_none());
        assert!(level_spec(101).is_none());
    }

    #[test]
    fn test_every_fifth_level_is_a_speed_run() {
        let speed = level_spec(15).unwrap();
        assert_eq!(speed.kind, LevelKind::SpeedRun);
        assert_eq!(speed.time_budget, Some(speed.questions as u64 * 4));

        let mastery = level_spec(20).unwrap();
        assert_eq!(mastery.kind, LevelKind::MasteryChallenge);
        assert!(mastery.time_budget.is_some());

        assert_eq!(level_spec(13).unwrap().kind, LevelKind::Standard);
        assert!(level_spec(13).unwrap().time_budget.is_none());
    }

    #[test]
    fn test_star_thresholds() {
        let spec = level_spec(1).unwrap();
        assert_eq!(score_stars(&spec, &summary_for(&spec, 10, 40.0)), 3);
        assert_eq!(score_stars(&spec, &summary_for(&spec, 9, 40.0)), 2);
        assert_eq!(score_stars(&spec, &summary_for(&spec, 8, 40.0)), 1);
        assert_eq!(score_stars(&spec, &summary_for(&spec, 7, 40.0)), 0);
    }

    #[test]
    fn test_abandoned_run_scores_zero() {
        let spec = level_spec(1).unwrap();
        let mut summary = summary_for(&spec, 5, 10.0);
        summary.total = 5;
        summary.accuracy = 100.0;
        assert_eq!(score_stars(&spec, &summary), 0);
    }

    #[test]
    fn test_speed_run_budget_gates_pass_and_third_star() {
        let spec = level_spec(5).unwrap();
        let budget = spec.time_budget.unwrap() as f64;

        // Over budget fails outright even with perfect accuracy
        let over = summary_for(&spec, spec.questions, budget + 1.0);
        assert_eq!(score_stars(&spec, &over), 0);

        // Inside the pass budget but over the 3-star budget: capped at 2
        let slow_perfect = summary_for(&spec, spec.questions, budget - 1.0);
        assert_eq!(score_stars(&spec, &slow_perfect), 2);

        let fast_perfect =
            summary_for(&spec, spec.questions, (spec.questions * 3) as f64 - 1.0);
        assert_eq!(score_stars(&spec, &fast_perfect), 3);
    }

    #[test]
    fn test_unlock_follows_total_stars() {
        let mut book = LevelBook::default();
        assert!(book.is_unlocked(&level_spec(1).unwrap()));
        assert!(!book.is_unlocked(&level_spec(2).unwrap()));

        book.record(1, 2);
        assert!(book.is_unlocked(&level_spec(2).unwrap()));
        assert!(!book.is_unlocked(&level_spec(3).unwrap()));
    }

    #[test]
    fn test_record_keeps_best_rating() {
        let mut book = LevelBook::default();
        assert!(book.record(4, 2));
        assert!(!book.record(4, 1), "worse run must not downgrade");
        assert!(!book.record(4, 0), "a fail must not erase a pass");
        assert_eq!(book.stars(4), 2);
        assert!(book.record(4, 3));
        assert_eq!(book.total_stars(), 3);
        assert_eq!(book.completed_levels(), 1);
    }

    #[test]
    fn test_next_level_skips_passed_rungs() {
        let mut book = LevelBook::default();
        assert_eq!(book.next_level(), 1);
        book.record(1, 3);
        book.record(2, 2);
        assert_eq!(book.next_level(), 3);
    }
}
