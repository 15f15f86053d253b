use crate::domain::storage::RecordStore;
use crate::domain::{Entity, Record, RunManifest};
use crate::error::{Result, ScrapeError};
use crate::utils::normalize_id;
use std::fs;
use std::path::Path;

const SEED_NAME_COLUMNS: [&str; 3] = ["Player", "Name", "Team"];
const SEED_ID_COLUMNS: [&str; 2] = ["Player ID", "ID"];

/// Index of the first of `candidates` present in `headers`.
fn seed_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

/// Record files as CSV with a header row, manifests as JSON.
#[derive(Clone, Default)]
pub struct CsvStore;

impl CsvStore {
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn load_seeds(&self, path: &Path) -> Result<Vec<Entity>> {
        if !path.exists() {
            return Err(ScrapeError::Input(format!(
                "input file {} does not exist",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();
        let name_col = seed_column(&headers, &SEED_NAME_COLUMNS).ok_or_else(|| {
            ScrapeError::Input(format!(
                "{} has none of the columns {:?}",
                path.display(),
                SEED_NAME_COLUMNS
            ))
        })?;
        let id_col = seed_column(&headers, &SEED_ID_COLUMNS);

        let mut seeds = Vec::new();
        for row in reader.records() {
            let row = row?;
            let name = row.get(name_col).map(str::trim).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let id = id_col.and_then(|i| row.get(i)).and_then(normalize_id);
            seeds.push(Entity::player(name, id));
        }
        Ok(seeds)
    }

    fn save_records(&self, path: &Path, columns: &[String], records: &[Record]) -> Result<()> {
        self.ensure_parent(path)?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = Path::new(&tmp_name);

        let mut writer = csv::Writer::from_path(tmp)?;
        writer.write_record(columns)?;
        for record in records {
            writer.write_record(record.row(columns))?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(tmp, path)?;
        Ok(())
    }

    fn load_records(&self, path: &Path) -> Result<Vec<Record>> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(Record::from_pairs(headers.iter().zip(row.iter())));
        }
        Ok(records)
    }

    fn save_manifest(&self, path: &Path, manifest: &RunManifest) -> Result<()> {
        self.ensure_parent(path)?;
        let content = serde_json::to_string_pretty(manifest)?;
        fs::write(path, content)?;
        Ok(())
    }
}
