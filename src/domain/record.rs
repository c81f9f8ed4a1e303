use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A policy document accepted by a collection run.
///
/// Records are constructed once, when a candidate passes relevance and
/// deduplication checks, and never mutated afterwards. The `timestamp` is
/// the moment the record was admitted, not a property of the underlying
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub url: String,
    /// Canonical form of `url`. Always present on records produced by this
    /// crate; kept optional so batches written by older collectors that
    /// never normalized still merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_url: Option<String>,
    pub title: String,
    /// Page the link was discovered on (search-driven sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Result snippet (legislative sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PolicyRecord {
    /// Key under which the merger tracks record identity.
    pub fn identity_key(&self) -> &str {
        self.normalized_url.as_deref().unwrap_or(&self.url)
    }
}
