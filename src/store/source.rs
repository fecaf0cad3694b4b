use rust_embed::Embed;

use crate::store::json_store::JsonStore;
use crate::store::schema::AttemptLogData;

#[derive(Embed)]
#[folder = "assets/seed/"]
struct SeedAssets;

/// Where the attempt log came from at startup. Surfaced in the stats
/// dashboard footer so a user staring at unfamiliar numbers can tell demo
/// data from their own history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    /// Parsed from the user's data file.
    UserFile,
    /// Bundled demo history; no usable user file was found.
    Seed,
    /// Nothing available, starting blank.
    Empty,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::UserFile => "user",
            DataSource::Seed => "seed",
            DataSource::Empty => "empty",
        }
    }
}

fn load_seed() -> Option<AttemptLogData> {
    let file = SeedAssets::get("attempts.json")?;
    let content = std::str::from_utf8(file.data.as_ref()).ok()?;
    serde_json::from_str(content).ok()
}

/// Resolve the attempt log through the fallback chain: the user's file wins,
/// a missing or unreadable file falls back to the bundled seed, and a broken
/// seed still yields an empty log rather than an error.
pub fn resolve_attempt_log(store: &JsonStore) -> (AttemptLogData, DataSource) {
    if let Some(data) = store.load_attempt_log() {
        return (data, DataSource::UserFile);
    }
    if let Some(seed) = load_seed() {
        return (seed, DataSource::Seed);
    }
    (AttemptLogData::default(), DataSource::Empty)
}
