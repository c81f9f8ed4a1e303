use thiserror::Error;

use crate::domain::record::PolicyRecord;

pub mod batch;

pub use batch::JsonBatchRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub trait BatchReader {
    fn load_batch(&self, name: &str) -> RepositoryResult<Vec<PolicyRecord>>;
}

pub trait BatchWriter {
    fn save_batch(&self, name: &str, records: &[PolicyRecord]) -> RepositoryResult<usize>;
}
