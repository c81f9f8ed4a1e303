//! Helpers for integration tests.

use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use policy_crawlers::domain::record::PolicyRecord;
use policy_crawlers::processing::url::normalize_url;
use policy_crawlers::repository::JsonBatchRepository;

/// Temporary output directory used in integration tests. The directory and
/// everything in it are removed on drop.
pub struct TestOutput {
    dir: TempDir,
}

impl TestOutput {
    pub fn new() -> Self {
        TestOutput {
            dir: TempDir::new().expect("Failed to create temporary output directory."),
        }
    }

    pub fn repo(&self) -> JsonBatchRepository {
        JsonBatchRepository::new(self.dir.path())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Builds a record shaped the way crawlers admit them.
pub fn record(url: &str, title: &str, timestamp: &str) -> PolicyRecord {
    PolicyRecord {
        url: url.to_string(),
        normalized_url: Some(normalize_url(url)),
        title: title.to_string(),
        source_url: Some("https://example.gov/listing".to_string()),
        summary: None,
        timestamp: timestamp
            .parse::<DateTime<Utc>>()
            .expect("Failed to parse test timestamp."),
    }
}
