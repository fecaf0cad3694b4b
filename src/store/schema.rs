use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::session::attempt::Attempt;
use crate::session::summary::SessionSummary;

const SCHEMA_VERSION: u32 = 1;

/// The attempt log is the source of truth: every stat, chart, mastery level
/// and recommendation is recomputed from it on demand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptLogData {
    pub schema_version: u32,
    /// Highest id ever assigned; ids are never reused after deletion.
    pub last_id: u64,
    pub attempts: Vec<Attempt>,
}

impl Default for AttemptLogData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            last_id: 0,
            attempts: Vec::new(),
        }
    }
}

impl AttemptLogData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Assign the next id and append. Returns the assigned id.
    pub fn append(&mut self, mut attempt: Attempt) -> u64 {
        self.last_id += 1;
        attempt.id = self.last_id;
        self.attempts.push(attempt);
        self.last_id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionLogData {
    pub schema_version: u32,
    pub sessions: Vec<SessionSummary>,
}

impl Default for SessionLogData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AchievementData {
    pub schema_version: u32,
    pub unlocked: Vec<String>,
}

impl Default for AchievementData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            unlocked: Vec::new(),
        }
    }
}

/// Best star rating per level id. Failed runs are never written, so absence
/// means "not passed yet".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelProgressData {
    pub schema_version: u32,
    pub stars: BTreeMap<u32, u8>,
}

impl Default for LevelProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stars: BTreeMap::new(),
        }
    }
}

pub const EXPORT_VERSION: u32 = 1;

/// Export contract: the attempt log carries everything derived stats need,
/// so exports hold raw logs plus config and re-import reproduces the exact
/// same dashboards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub mathdr_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub attempt_log: AttemptLogData,
    pub session_log: SessionLogData,
    pub achievements: AchievementData,
    /// Absent in exports written before the level ladder existed.
    #[serde(default)]
    pub levels: LevelProgressData,
}
