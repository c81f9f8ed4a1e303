use std::collections::HashSet;

use chrono::Utc;

use crate::domain::record::PolicyRecord;
use crate::processing::content::{fingerprint, is_similar};
use crate::processing::url::normalize_url;

/// Provenance a candidate carries into the record it may become.
#[derive(Debug, Clone)]
pub enum RecordSource {
    /// Page or search engine the link was discovered on.
    Page(String),
    /// Snippet displayed next to the result by the portal being scraped.
    Summary(String),
}

impl RecordSource {
    fn into_fields(self) -> (Option<String>, Option<String>) {
        match self {
            RecordSource::Page(url) => (Some(url), None),
            RecordSource::Summary(text) => (None, Some(text)),
        }
    }
}

/// Admission state for one collection run.
///
/// Tracks every normalized URL and title fingerprint the run has seen, plus
/// the records accepted so far. A candidate is admitted only when all
/// duplicate checks pass; rejections are silent. Created fresh at run start
/// and discarded with the run, so nothing leaks across runs except the
/// persisted batch.
///
/// The similarity scans in [`DedupLedger::try_admit`] are linear in the
/// number of accepted records and seen URLs, making admission over a whole
/// run quadratic. Runs produce tens to low hundreds of candidates, where
/// that stays cheap; revisit before pointing it at anything larger.
pub struct DedupLedger {
    similarity_threshold: f64,
    url_similarity_threshold: f64,
    seen_urls: HashSet<String>,
    seen_hashes: HashSet<String>,
    records: Vec<PolicyRecord>,
}

impl DedupLedger {
    pub fn new(similarity_threshold: f64, url_similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
            url_similarity_threshold,
            seen_urls: HashSet::new(),
            seen_hashes: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Marks a page URL as processed without creating a record.
    ///
    /// Listing pages pass through here before their links are extracted, so
    /// each page is fetched once per run and can never be re-admitted as one
    /// of its own results.
    pub fn mark_visited(&mut self, url: &str) {
        self.seen_urls.insert(normalize_url(url));
    }

    /// Whether a URL was already visited or admitted during this run.
    pub fn is_visited(&self, url: &str) -> bool {
        self.seen_urls.contains(&normalize_url(url))
    }

    fn is_duplicate(&self, normalized: &str, hash: &str, title: &str) -> bool {
        if self.seen_urls.contains(normalized) {
            return true;
        }
        if self.seen_hashes.contains(hash) {
            return true;
        }
        if self
            .records
            .iter()
            .any(|record| is_similar(title, &record.title, self.similarity_threshold))
        {
            return true;
        }
        if self
            .seen_urls
            .iter()
            .any(|seen| is_similar(normalized, seen, self.url_similarity_threshold))
        {
            return true;
        }
        self.records
            .iter()
            .any(|record| record.normalized_url.as_deref() == Some(normalized))
    }

    /// Admits a candidate if nothing like it has been seen this run.
    ///
    /// Checks run in order: exact normalized-URL hit, exact fingerprint hit,
    /// near-similar title against accepted titles, near-similar URL against
    /// seen URLs, and a final exact match against accepted records. On
    /// admission the record is stamped with the current time, both identity
    /// keys are recorded, and a copy of the record is returned. Similarity
    /// rejections leave the sets untouched.
    pub fn try_admit(
        &mut self,
        url: &str,
        title: &str,
        source: RecordSource,
    ) -> Option<PolicyRecord> {
        let normalized = normalize_url(url);
        let hash = fingerprint(title);

        if self.is_duplicate(&normalized, &hash, title) {
            return None;
        }

        let (source_url, summary) = source.into_fields();
        let record = PolicyRecord {
            url: url.to_string(),
            normalized_url: Some(normalized.clone()),
            title: title.to_string(),
            source_url,
            summary,
            timestamp: Utc::now(),
        };

        self.seen_hashes.insert(hash);
        self.seen_urls.insert(normalized);
        self.records.push(record.clone());
        Some(record)
    }

    /// Records accepted so far, in admission order.
    pub fn records(&self) -> &[PolicyRecord] {
        &self.records
    }

    /// Consumes the ledger, yielding the run's batch.
    pub fn into_records(self) -> Vec<PolicyRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> DedupLedger {
        DedupLedger::new(0.85, 0.9)
    }

    fn page() -> RecordSource {
        RecordSource::Page("https://www.google.com".to_string())
    }

    #[test]
    fn rejects_url_differing_only_by_tracking_param() {
        let mut ledger = ledger();
        assert!(
            ledger
                .try_admit("https://example.gov/ai-act", "EU AI Act", page())
                .is_some()
        );
        assert!(
            ledger
                .try_admit(
                    "https://example.gov/ai-act?utm_source=feed",
                    "EU AI Act",
                    page(),
                )
                .is_none()
        );
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn rejects_fingerprint_identical_title() {
        let mut ledger = ledger();
        assert!(
            ledger
                .try_admit("https://a.gov/one", "AI Policy", page())
                .is_some()
        );
        assert!(
            ledger
                .try_admit("https://b.org/two", "ai   POLICY", page())
                .is_none()
        );
    }

    #[test]
    fn rejects_near_similar_title() {
        let mut ledger = ledger();
        assert!(
            ledger
                .try_admit("https://a.gov/one", "AI Policy Update 2024", page())
                .is_some()
        );
        assert!(
            ledger
                .try_admit("https://b.org/two", "AI Policy Update 2025", page())
                .is_none()
        );
    }

    #[test]
    fn rejects_near_similar_url() {
        let mut ledger = ledger();
        assert!(
            ledger
                .try_admit(
                    "https://example.gov/ai-policy-2024",
                    "AI Policy 2024 Report",
                    page(),
                )
                .is_some()
        );
        assert!(
            ledger
                .try_admit(
                    "https://example.gov/ai-policy-2025",
                    "Completely Different Name",
                    page(),
                )
                .is_none()
        );
    }

    #[test]
    fn admits_distinct_candidates_in_order() {
        let mut ledger = ledger();
        let first = ledger
            .try_admit("https://nist.gov/ai-rmf", "NIST AI Risk Framework", page())
            .unwrap();
        let second = ledger
            .try_admit(
                "https://europa.eu/digital-strategy",
                "European Digital Strategy",
                RecordSource::Summary("Strategy overview".to_string()),
            )
            .unwrap();
        assert_eq!(
            first.normalized_url.as_deref(),
            Some("https://nist.gov/ai-rmf")
        );
        assert_eq!(second.summary.as_deref(), Some("Strategy overview"));
        assert_eq!(ledger.records().len(), 2);
        let records = ledger.into_records();
        assert_eq!(records[0].title, "NIST AI Risk Framework");
        assert_eq!(records[1].title, "European Digital Strategy");
    }

    #[test]
    fn visited_page_cannot_be_admitted() {
        let mut ledger = ledger();
        ledger.mark_visited("https://example.gov/news/");
        assert!(ledger.is_visited("https://example.gov/news"));
        assert!(
            ledger
                .try_admit("https://example.gov/news", "Gov News", page())
                .is_none()
        );
    }
}
