//! Crawler for AI-related bills on the congress.gov search portal. Results
//! are paginated server-side; each page is parsed for result rows and the
//! relevant ones are admitted as records pointing at the bill's full text.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::sync::Mutex;
use url::Url;

use crate::crawlers::{CrawlerError, CrawlerResult, PolicyCrawler, build_reqwest_client};
use crate::domain::record::PolicyRecord;
use crate::models::config::{CongressConfig, ScraperConfig};
use crate::processing::dedup::{DedupLedger, RecordSource};

/// The portal search casts a wide net; only bills naming one of these
/// technologies in their title or latest-action line are kept.
const BILL_KEYWORDS: &[&str] = &[
    "artificial intelligence",
    "machine learning",
    "ai governance",
    "neural network",
    "automated decision",
    "foundation model",
    "deep learning",
    "facial recognition",
    "algorithmic accountability",
];

pub struct CongressCrawler {
    base_url: Url,
    config: CongressConfig,
    client: reqwest::Client,
    ledger: Mutex<DedupLedger>,
}

impl CongressCrawler {
    pub fn new(config: &ScraperConfig) -> CrawlerResult<Self> {
        let congress = config.congress.clone();
        Ok(Self {
            base_url: Url::parse(&congress.base_url)
                .map_err(|e| CrawlerError::Build(e.to_string()))?,
            client: build_reqwest_client(Duration::from_secs(congress.request_timeout))?,
            ledger: Mutex::new(DedupLedger::new(
                config.similarity_threshold,
                config.url_similarity_threshold,
            )),
            config: congress,
        })
    }

    /// Builds the search URL for one result page. The portal takes its
    /// search as a JSON-encoded `q` parameter.
    fn search_page_url(&self, page: usize) -> Url {
        let query = serde_json::json!({
            "source": "legislation",
            "search": self.config.search_term,
        });
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &query.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// Fetches a page, pausing longer before each retry. The portal
    /// rate-limits impatient clients.
    async fn fetch_html(&self, url: &str) -> Option<Html> {
        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                let pause = self.config.retry_delay * attempt as u64;
                tokio::time::sleep(Duration::from_secs(pause)).await;
            }
            match self.client.get(url).send().await {
                Ok(res) if res.status().is_success() => match res.text().await {
                    Ok(text) => return Some(Html::parse_document(&text)),
                    Err(e) => log::warn!("Failed to read body from {url}: {e}"),
                },
                Ok(res) => log::warn!(
                    "Failed to get URL {}: {} (attempt {})",
                    url,
                    res.status(),
                    attempt + 1
                ),
                Err(e) => log::warn!("Failed to get URL {url}: {e} (attempt {})", attempt + 1),
            }
        }
        log::error!(
            "Giving up on {url} after {} attempts",
            self.config.max_retries
        );
        None
    }

    /// Parses one result page into (title, bill text URL, summary) rows.
    fn parse_result_rows(document: &Html) -> Vec<(String, String, String)> {
        let row_selector = Selector::parse("ol.basic-search-results-lists > li").unwrap();
        let title_selector = Selector::parse(".result-heading a").unwrap();
        let summary_selector = Selector::parse(".result-title").unwrap();

        document
            .select(&row_selector)
            .filter_map(|row| {
                let title_tag = row.select(&title_selector).next()?;
                let href = title_tag.value().attr("href")?;
                let title = title_tag.text().collect::<String>().trim().to_string();
                let summary = row
                    .select(&summary_selector)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .unwrap_or_default();
                Some((title, bill_text_url(href), summary))
            })
            .collect()
    }

    fn has_next_page(document: &Html) -> bool {
        let selector = Selector::parse("a.pagination-next").unwrap();
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().contains("Next"))
            .unwrap_or(false)
    }
}

/// Rewrites a result href to the bill's full-text view on the portal.
fn bill_text_url(href: &str) -> String {
    match href.split_once('?') {
        Some((path, query)) => format!("https://www.congress.gov{path}/text?{query}"),
        None => format!("https://www.congress.gov{href}/text"),
    }
}

fn is_relevant_bill(title: &str, summary: &str) -> bool {
    let text = format!("{} {}", title.to_lowercase(), summary.to_lowercase());
    BILL_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

#[async_trait]
impl PolicyCrawler for CongressCrawler {
    /// Walks the portal's paginated search results, admitting every
    /// relevant bill. Pages are fetched one at a time with a pause between
    /// them; the portal throttles parallel clients quickly.
    async fn collect(&self) -> Vec<PolicyRecord> {
        for page in 1..=self.config.max_pages {
            if page > 1 {
                tokio::time::sleep(Duration::from_secs(self.config.search_delay)).await;
            }

            let page_url = self.search_page_url(page);
            let Some(document) = self.fetch_html(page_url.as_str()).await else {
                break;
            };

            let rows = Self::parse_result_rows(&document);
            let more = Self::has_next_page(&document);
            drop(document);

            if rows.is_empty() {
                log::info!("No results on page {page}");
                break;
            }
            log::info!("Found {} results on page {page}", rows.len());

            let mut ledger = self.ledger.lock().await;
            for (title, url, summary) in rows {
                if !is_relevant_bill(&title, &summary) {
                    continue;
                }
                if ledger
                    .try_admit(&url, &title, RecordSource::Summary(summary))
                    .is_some()
                {
                    log::info!("Found relevant bill: {title}");
                }
            }
            drop(ledger);

            if !more {
                log::info!("No more pages to process");
                break;
            }
        }

        self.ledger.lock().await.records().to_vec()
    }
}
