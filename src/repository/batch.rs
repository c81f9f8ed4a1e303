use std::fs;
use std::path::PathBuf;

use crate::domain::record::PolicyRecord;
use crate::repository::{BatchReader, BatchWriter, RepositoryResult};

/// Flat-file batch store: one pretty-printed JSON array of records per
/// run source, all under a single output directory.
pub struct JsonBatchRepository {
    base_dir: PathBuf,
}

impl JsonBatchRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn batch_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

impl BatchReader for JsonBatchRepository {
    fn load_batch(&self, name: &str) -> RepositoryResult<Vec<PolicyRecord>> {
        let raw = fs::read_to_string(self.batch_path(name))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl BatchWriter for JsonBatchRepository {
    fn save_batch(&self, name: &str, records: &[PolicyRecord]) -> RepositoryResult<usize> {
        fs::create_dir_all(&self.base_dir)?;
        let json = serde_json::to_string_pretty(records)?;
        fs::write(self.batch_path(name), json)?;
        Ok(records.len())
    }
}
