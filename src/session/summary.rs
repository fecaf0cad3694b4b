use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::attempt::Attempt;
use crate::session::practice::PracticeSession;

/// End-of-session roll-up. Built once when a session completes (or is
/// abandoned with progress), reported to the summary screen, appended to the
/// session log, and fed to the achievement checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: String,
    pub operation: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_speed: f64,
    pub total_time: f64,
    pub best_run: usize,
    /// Missed attempts in chronological order.
    pub mistakes: Vec<Attempt>,
    pub timestamp: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_session(session: &PracticeSession) -> Self {
        let total = session.asked;
        let total_time: f64 = session.attempts.iter().map(|a| a.time_taken).sum();
        Self {
            mode: session.kind.as_str().to_string(),
            operation: session.choice.as_str().to_string(),
            total,
            correct: session.correct,
            accuracy: if total > 0 {
                session.correct as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            avg_speed: if total > 0 {
                total_time / total as f64
            } else {
                0.0
            },
            total_time,
            best_run: session.best_run,
            mistakes: session.mistakes.clone(),
            timestamp: Utc::now(),
        }
    }
}
