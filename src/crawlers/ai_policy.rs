//! Crawler for AI policy documents published by governments and
//! institutions. Seed pages come from a programmable search engine; the
//! records themselves are the relevant links harvested off those pages.

use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use tokio::sync::{Mutex, Semaphore};
use url::Url;

use crate::crawlers::{CrawlerError, CrawlerResult, PolicyCrawler, build_reqwest_client};
use crate::domain::record::PolicyRecord;
use crate::models::config::ScraperConfig;
use crate::processing::content::is_relevant;
use crate::processing::dedup::{DedupLedger, RecordSource};
use crate::processing::url::is_trusted_domain;

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

pub struct AiPolicyCrawler {
    api_key: String,
    search_engine_id: String,
    config: ScraperConfig,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    ledger: Mutex<DedupLedger>,
}

impl AiPolicyCrawler {
    /// Creates the crawler with credentials taken from `GOOGLE_API_KEY` and
    /// `GOOGLE_CSE_ID`.
    pub fn new(config: ScraperConfig) -> CrawlerResult<Self> {
        let api_key = env::var("GOOGLE_API_KEY").unwrap_or_default();
        let search_engine_id = env::var("GOOGLE_CSE_ID").unwrap_or_default();
        Self::with_credentials(config, api_key, search_engine_id)
    }

    /// Creates the crawler with explicit credentials.
    pub fn with_credentials(
        config: ScraperConfig,
        api_key: String,
        search_engine_id: String,
    ) -> CrawlerResult<Self> {
        if api_key.is_empty() || search_engine_id.is_empty() {
            return Err(CrawlerError::Configuration(
                "Google API credentials are required; set GOOGLE_API_KEY and GOOGLE_CSE_ID"
                    .to_string(),
            ));
        }
        Ok(Self {
            client: build_reqwest_client(Duration::from_secs(config.request_timeout))?,
            semaphore: Arc::new(Semaphore::new(config.max_workers)),
            ledger: Mutex::new(DedupLedger::new(
                config.similarity_threshold,
                config.url_similarity_threshold,
            )),
            api_key,
            search_engine_id,
            config,
        })
    }

    /// Runs one search query and returns the result links hosted on a
    /// trusted domain.
    async fn search(&self, query: &str) -> CrawlerResult<Vec<String>> {
        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query),
                ("num", "10"),
            ])
            .send()
            .await
            .map_err(|e| CrawlerError::Api(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CrawlerError::Api(format!(
                "search returned {} for query '{query}'",
                response.status()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| CrawlerError::Api(e.to_string()))?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| CrawlerError::Api(e.to_string()))?;
        Ok(parsed
            .items
            .into_iter()
            .map(|item| item.link)
            .filter(|link| is_trusted_domain(link, &self.config.trusted_domains))
            .collect())
    }

    /// Collects candidate page URLs across all configured queries. A failed
    /// query is logged and skipped so the remaining queries still run.
    /// Queries are spaced by the configured delay to stay inside the API
    /// quota.
    async fn discover_urls(&self) -> Vec<String> {
        let mut discovered = HashSet::new();
        for (i, query) in self.config.search_queries.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_secs(self.config.search_delay)).await;
            }
            match self.search(query).await {
                Ok(links) => {
                    discovered.extend(links);
                }
                Err(e) => {
                    log::error!("Error searching for query '{query}': {e}");
                }
            }
        }
        discovered.into_iter().collect()
    }

    async fn fetch_html(&self, url: &str) -> Option<Html> {
        let _permit = self.semaphore.acquire().await.ok()?;
        let res = self.client.get(url).send().await.ok()?;
        if !res.status().is_success() {
            log::warn!("Failed to get URL {}: {}", url, res.status());
            return None;
        }
        let text = res.text().await.ok()?;
        Some(Html::parse_document(&text))
    }

    /// Fetches one discovered page and returns every anchor on it as a
    /// (text, absolute url) pair.
    async fn page_candidates(&self, page_url: &str, base: &Url) -> Vec<(String, String)> {
        let document = match self.fetch_html(page_url).await {
            Some(document) => document,
            None => {
                log::warn!("Failed to parse HTML {page_url}");
                return vec![];
            }
        };
        candidate_links(base, &document)
    }

    /// Checks that a candidate URL is well-formed, not yet visited and
    /// reachable.
    async fn validate_url(&self, url: &str) -> bool {
        if Url::parse(url).is_err() {
            return false;
        }
        if self.ledger.lock().await.is_visited(url) {
            return false;
        }
        let Ok(_permit) = self.semaphore.acquire().await else {
            return false;
        };
        match self.client.head(url).send().await {
            Ok(res) => res.status() == 200,
            Err(e) => {
                log::error!("Error validating URL {url}: {e}");
                false
            }
        }
    }

    /// Marks a discovered page as visited, then admits every relevant,
    /// reachable, trusted link found on it. Returns the number of records
    /// admitted from this page.
    async fn extract_links(&self, page_url: &str) -> usize {
        {
            let mut ledger = self.ledger.lock().await;
            if ledger.is_visited(page_url) {
                return 0;
            }
            ledger.mark_visited(page_url);
        }

        let Ok(base) = Url::parse(page_url) else {
            log::warn!("Skipping malformed page URL {page_url}");
            return 0;
        };

        let candidates = self.page_candidates(page_url, &base).await;

        let mut admitted = 0;
        for (text, full_url) in candidates {
            if !is_relevant(&text, &full_url, &self.config.keywords) {
                continue;
            }
            if !self.validate_url(&full_url).await {
                continue;
            }
            if !is_trusted_domain(&full_url, &self.config.trusted_domains) {
                continue;
            }
            let mut ledger = self.ledger.lock().await;
            if ledger
                .try_admit(&full_url, &text, RecordSource::Page(page_url.to_string()))
                .is_some()
            {
                log::debug!("Added new result: {full_url}");
                admitted += 1;
            }
        }
        admitted
    }
}

/// Pulls every anchor out of a parsed page, resolving relative hrefs
/// against the page URL.
fn candidate_links(base: &Url, document: &Html) -> Vec<(String, String)> {
    let selector = Selector::parse("a[href]").unwrap();
    document
        .select(&selector)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let text = link.text().collect::<String>().trim().to_string();
            let full_url = base.join(href).ok()?.to_string();
            Some((text, full_url))
        })
        .collect()
}

#[async_trait]
impl PolicyCrawler for AiPolicyCrawler {
    /// Discovers seed pages through the search API, then extracts links
    /// from all of them concurrently. Page and validation requests share
    /// one semaphore, so no more than the configured number of requests is
    /// in flight at a time; admission is serialized through the run's
    /// ledger.
    async fn collect(&self) -> Vec<PolicyRecord> {
        let discovered = self.discover_urls().await;
        log::info!("Discovered {} potential URLs", discovered.len());

        let mut tasks = vec![];
        for url in &discovered {
            tasks.push(async move { self.extract_links(url).await });
        }
        let admitted: usize = futures::future::join_all(tasks).await.into_iter().sum();
        log::info!(
            "Extracted {admitted} records from {} pages",
            discovered.len()
        );

        self.ledger.lock().await.records().to_vec()
    }
}
