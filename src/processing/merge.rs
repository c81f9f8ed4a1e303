use std::collections::HashSet;

use crate::domain::record::PolicyRecord;
use crate::processing::content::fingerprint;
use crate::repository::{BatchReader, BatchWriter, RepositoryResult};

/// Combines per-run batches into one deduplicated, time-ordered dataset.
///
/// Cross-batch dedup is exact only: a record is admitted when both its
/// identity key (normalized URL, falling back to the raw URL) and its title
/// fingerprint are unseen. Per-run admission rejects on any of several
/// signals including near-similarity; the merge deliberately re-checks just
/// the two exact keys and trusts each batch to have done the fuzzy work.
pub struct RecordMerger {
    seen_urls: HashSet<String>,
    seen_hashes: HashSet<String>,
    merged: Vec<PolicyRecord>,
}

impl RecordMerger {
    pub fn new() -> Self {
        Self {
            seen_urls: HashSet::new(),
            seen_hashes: HashSet::new(),
            merged: Vec::new(),
        }
    }

    /// Folds one batch into the merged set, keeping only unseen records.
    ///
    /// Batches are processed in call order and records in their stored
    /// order, so when the same document appears in two batches the earlier
    /// batch wins.
    pub fn add_batch(&mut self, batch: Vec<PolicyRecord>) {
        for record in batch {
            let identity = record.identity_key().to_string();
            let hash = fingerprint(&record.title);
            if self.seen_urls.contains(&identity) || self.seen_hashes.contains(&hash) {
                continue;
            }
            self.seen_urls.insert(identity);
            self.seen_hashes.insert(hash);
            self.merged.push(record);
        }
    }

    /// Finishes the merge, returning records newest first.
    ///
    /// The sort is stable, so records sharing a timestamp keep the order in
    /// which they were admitted.
    pub fn finish(mut self) -> Vec<PolicyRecord> {
        self.merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.merged
    }
}

impl Default for RecordMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges in-memory batches in the given order.
pub fn merge_batches(batches: Vec<Vec<PolicyRecord>>) -> Vec<PolicyRecord> {
    let mut merger = RecordMerger::new();
    for batch in batches {
        merger.add_batch(batch);
    }
    merger.finish()
}

/// Reads the named batches through the repository, merges them and writes
/// the result to `target`.
///
/// A batch that is missing or fails to parse is skipped with a warning; the
/// merge itself never fails on bad input, only on failing to write the
/// output. Zero readable batches produce an empty output file.
pub fn merge_batch_files<R>(repo: &R, sources: &[String], target: &str) -> RepositoryResult<usize>
where
    R: BatchReader + BatchWriter,
{
    let mut merger = RecordMerger::new();

    for source in sources {
        match repo.load_batch(source) {
            Ok(batch) => {
                log::info!("Loaded {} records from {source}", batch.len());
                merger.add_batch(batch);
            }
            Err(e) => {
                log::warn!("Skipping batch {source}: {e}");
            }
        }
    }

    let merged = merger.finish();
    let count = repo.save_batch(target, &merged)?;
    log::info!("Saved {count} merged records to {target}");
    Ok(count)
}
