use std::collections::BTreeSet;

use crate::session::summary::SessionSummary;

/// Fixed badge set, unlock-once. Codes are the persisted identity; names and
/// descriptions live in the locale files under `achievements.<code>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    FirstSteps,
    Centurion,
    Sniper,
    SpeedDemon,
    Marathoner,
    MasterMind,
}

pub const ALL_BADGES: [Badge; 6] = [
    Badge::FirstSteps,
    Badge::Centurion,
    Badge::Sniper,
    Badge::SpeedDemon,
    Badge::Marathoner,
    Badge::MasterMind,
];

impl Badge {
    pub fn code(self) -> &'static str {
        match self {
            Badge::FirstSteps => "first_steps",
            Badge::Centurion => "centurion",
            Badge::Sniper => "sniper",
            Badge::SpeedDemon => "speed_demon",
            Badge::Marathoner => "marathoner",
            Badge::MasterMind => "master_mind",
        }
    }
}

/// The unlocked-badge set, persisted as a list of codes.
#[derive(Clone, Debug, Default)]
pub struct AchievementBook {
    unlocked: BTreeSet<String>,
}

impl AchievementBook {
    pub fn from_codes(codes: impl IntoIterator<Item = String>) -> Self {
        Self {
            unlocked: codes.into_iter().collect(),
        }
    }

    pub fn codes(&self) -> Vec<String> {
        self.unlocked.iter().cloned().collect()
    }

    pub fn is_unlocked(&self, badge: Badge) -> bool {
        self.unlocked.contains(badge.code())
    }

    fn try_unlock(&mut self, badge: Badge) -> bool {
        self.unlocked.insert(badge.code().to_string())
    }

    /// Evaluate a completed session against every badge condition. Returns
    /// the badges newly unlocked by this session, in definition order.
    pub fn check_session(
        &mut self,
        summary: &SessionSummary,
        lifetime_attempts: usize,
    ) -> Vec<Badge> {
        let mut newly = Vec::new();
        let mut unlock_if = |book: &mut Self, badge: Badge, condition: bool| {
            if condition && book.try_unlock(badge) {
                newly.push(badge);
            }
        };

        // Any completed session with at least one answer counts.
        unlock_if(self, Badge::FirstSteps, summary.total > 0);
        unlock_if(self, Badge::Centurion, lifetime_attempts >= 100);
        unlock_if(
            self,
            Badge::Sniper,
            summary.total >= 20 && summary.correct == summary.total,
        );
        unlock_if(
            self,
            Badge::SpeedDemon,
            summary.total >= 20 && summary.avg_speed > 0.0 && summary.avg_speed < 2.0,
        );
        unlock_if(self, Badge::Marathoner, summary.total >= 50);
        unlock_if(
            self,
            Badge::MasterMind,
            summary.operation == "Mixed" && summary.total >= 20 && summary.accuracy >= 90.0,
        );

        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(operation: &str, total: usize, correct: usize, avg_speed: f64) -> SessionSummary {
        SessionSummary {
            mode: "Drill".to_string(),
            operation: operation.to_string(),
            total,
            correct,
            accuracy: if total > 0 {
                correct as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            avg_speed,
            total_time: avg_speed * total as f64,
            best_run: 0,
            mistakes: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_first_session_unlocks_first_steps() {
        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 5, 3, 4.0), 5);
        assert_eq!(newly, vec![Badge::FirstSteps]);
        assert!(book.is_unlocked(Badge::FirstSteps));
    }

    #[test]
    fn test_badges_unlock_only_once() {
        let mut book = AchievementBook::default();
        book.check_session(&summary("Addition", 5, 3, 4.0), 5);
        let again = book.check_session(&summary("Addition", 5, 3, 4.0), 10);
        assert!(again.is_empty());
    }

    #[test]
    fn test_sniper_needs_perfect_twenty() {
        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 20, 20, 3.0), 20);
        assert!(newly.contains(&Badge::Sniper));

        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 19, 19, 3.0), 19);
        assert!(!newly.contains(&Badge::Sniper));
    }

    #[test]
    fn test_speed_demon_needs_sub_two_seconds() {
        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 20, 15, 1.9), 20);
        assert!(newly.contains(&Badge::SpeedDemon));

        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 20, 15, 2.0), 20);
        assert!(!newly.contains(&Badge::SpeedDemon));
    }

    #[test]
    fn test_marathoner_at_fifty_questions() {
        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 50, 30, 4.0), 50);
        assert!(newly.contains(&Badge::Marathoner));
    }

    #[test]
    fn test_master_mind_requires_mixed_mode() {
        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Mixed", 20, 19, 3.0), 20);
        assert!(newly.contains(&Badge::MasterMind));

        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 20, 19, 3.0), 20);
        assert!(!newly.contains(&Badge::MasterMind));
    }

    #[test]
    fn test_centurion_counts_lifetime_attempts() {
        let mut book = AchievementBook::default();
        let newly = book.check_session(&summary("Addition", 10, 8, 3.0), 100);
        assert!(newly.contains(&Badge::Centurion));
    }
}
