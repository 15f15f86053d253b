use crate::domain::storage::RecordStore;
use crate::domain::Record;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Rewrites the destination file with everything gathered so far, every
/// `every` entities and once more at the end.
pub struct CheckpointWriter {
    store: Arc<dyn RecordStore>,
    destination: PathBuf,
    columns: Vec<String>,
    every: usize,
}

impl CheckpointWriter {
    pub fn new(
        store: Arc<dyn RecordStore>,
        destination: impl Into<PathBuf>,
        columns: Vec<String>,
        every: usize,
    ) -> Self {
        Self {
            store,
            destination: destination.into(),
            columns,
            every,
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Called after each entity; saves when `processed` hits the interval.
    /// Returns whether a checkpoint was written.
    pub fn observe(&self, processed: usize, records: &[Record]) -> Result<bool> {
        if self.every == 0 || processed == 0 || processed % self.every != 0 {
            return Ok(false);
        }
        self.store
            .save_records(&self.destination, &self.columns, records)?;
        debug!(
            "Checkpoint after {} entities: {} records in {:?}",
            processed,
            records.len(),
            self.destination
        );
        Ok(true)
    }

    pub fn finish(&self, records: &[Record]) -> Result<()> {
        self.store
            .save_records(&self.destination, &self.columns, records)?;
        info!("Saved {} records to {:?}", records.len(), self.destination);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::CsvStore;

    #[test]
    fn saves_on_the_interval_and_at_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(CsvStore::new());
        let writer = CheckpointWriter::new(
            store.clone(),
            dir.path().join("out.csv"),
            vec!["Season".to_string()],
            2,
        );

        let mut records = Vec::new();
        let mut saved_counts = Vec::new();
        for processed in 1..=5 {
            records.push(Record::from_pairs([("Season", processed.to_string())]));
            if writer.observe(processed, &records).unwrap() {
                saved_counts.push(store.load_records(writer.destination()).unwrap().len());
            }
        }
        writer.finish(&records).unwrap();
        let final_records = store.load_records(writer.destination()).unwrap();

        assert_eq!(saved_counts, vec![2, 4]);
        assert_eq!(final_records.len(), 5);
        // every checkpoint is a prefix of the final output
        assert_eq!(final_records[..4], records[..4]);
    }

    #[test]
    fn zero_interval_only_saves_at_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CheckpointWriter::new(
            Arc::new(CsvStore::new()),
            dir.path().join("out.csv"),
            vec!["Season".to_string()],
            0,
        );
        assert!(!writer.observe(50, &[]).unwrap());
        assert!(!writer.destination().exists());
        writer.finish(&[]).unwrap();
        assert!(writer.destination().exists());
    }
}
