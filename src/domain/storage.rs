use super::{Entity, Record, RunManifest};
use crate::error::Result;
use std::path::Path;

pub trait RecordStore: Send + Sync {
    /// Player (or team) names with optional ids, in file order.
    fn load_seeds(&self, path: &Path) -> Result<Vec<Entity>>;
    /// Replaces whatever is at `path` with `records` laid out as `columns`.
    fn save_records(&self, path: &Path, columns: &[String], records: &[Record]) -> Result<()>;
    fn load_records(&self, path: &Path) -> Result<Vec<Record>>;
    fn save_manifest(&self, path: &Path, manifest: &RunManifest) -> Result<()>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const TEAMS: &'static str = "teams";
    pub const ROSTER: &'static str = "roster";
    pub const INJURIES: &'static str = "df_injuries";
    pub const SEASON_STATS: &'static str = "df_season_stats";
    pub const MANIFEST_SUFFIX: &'static str = "manifest.json";
}
