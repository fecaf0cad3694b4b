use rand::Rng;
use rand::rngs::SmallRng;

use crate::session::attempt::Operation;
use crate::stats::mastery::{MasteryCell, MasteryLevel};

/// Why a cell was recommended; the UI turns this into localized text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reason {
    /// Unexplored cell: learn the basics.
    Explore,
    /// Accuracy is the bottleneck.
    FixAccuracy(f64),
    /// Accuracy is fine, push for speed.
    PushSpeed(f64),
    /// Mastered: occasional maintenance drill.
    Maintain,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recommendation {
    pub operation: Operation,
    pub digits: u8,
    pub level: MasteryLevel,
    pub reason: Reason,
}

fn score(cell: &MasteryCell) -> f64 {
    match cell.level {
        // High priority to explore new ground.
        MasteryLevel::Novice => 80.0,
        // Fixing errors beats everything: 60% accuracy scores 90.
        MasteryLevel::Apprentice => 100.0 - cell.accuracy + 50.0,
        // Among Pro cells, slower ones first.
        MasteryLevel::Pro => 40.0 + cell.avg_speed * 2.0,
        MasteryLevel::Master => 10.0,
    }
}

fn reason(cell: &MasteryCell) -> Reason {
    match cell.level {
        MasteryLevel::Novice => Reason::Explore,
        MasteryLevel::Apprentice => Reason::FixAccuracy(cell.accuracy),
        MasteryLevel::Pro => Reason::PushSpeed(cell.avg_speed),
        MasteryLevel::Master => Reason::Maintain,
    }
}

/// Pick what to drill next: score every mastery cell, then choose randomly
/// among the top three so repeated visits don't always nag about the same
/// cell.
pub fn recommend(grid: &[MasteryCell], rng: &mut SmallRng) -> Option<Recommendation> {
    if grid.is_empty() {
        return None;
    }
    let mut ranked: Vec<&MasteryCell> = grid.iter().collect();
    ranked.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top = &ranked[..ranked.len().min(3)];
    let cell = top[rng.gen_range(0..top.len())];
    Some(Recommendation {
        operation: cell.operation,
        digits: cell.digits,
        level: cell.level,
        reason: reason(cell),
    })
}
