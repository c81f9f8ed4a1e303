use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::record::PolicyRecord;

pub mod ai_policy;
pub mod congress;

/// Browser-like agent string; several government sites serve reduced markup
/// to unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum CrawlerError {
    /// A required credential or setting was missing at construction.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The HTTP client or a base URL could not be built.
    #[error("failed to build crawler: {0}")]
    Build(String),
    /// A search API call failed: transport, status or decode.
    #[error("search API error: {0}")]
    Api(String),
}

pub type CrawlerResult<T> = Result<T, CrawlerError>;

/// Builds the HTTP client shared by a crawler's requests, with the crawler
/// user agent and a per-request timeout.
pub fn build_reqwest_client(timeout: Duration) -> CrawlerResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| CrawlerError::Build(e.to_string()))
}

/// An abstraction over policy crawlers that produce [`PolicyRecord`]s.
#[async_trait]
pub trait PolicyCrawler: Send + Sync {
    /// Crawls the configured sources and returns every record admitted
    /// during the run, in admission order.
    async fn collect(&self) -> Vec<PolicyRecord>;
}
