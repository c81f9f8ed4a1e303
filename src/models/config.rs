//! Configuration model loaded from external sources.

use std::collections::HashSet;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Settings shared by the collection runs and the merge step.
///
/// Every field has a default, so an absent config file is fine; a YAML file
/// and `POLICY_`-prefixed environment variables override individual values.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Upper bound on concurrently processed pages within one run.
    pub max_workers: usize,
    /// Per-request HTTP timeout, seconds.
    pub request_timeout: u64,
    /// Pause between consecutive search-API queries, seconds.
    pub search_delay: u64,
    /// Title near-duplicate threshold, in [0, 1].
    pub similarity_threshold: f64,
    /// Normalized-URL near-duplicate threshold, in [0, 1].
    pub url_similarity_threshold: f64,
    /// Hosts a discovered link must match to be admitted.
    pub trusted_domains: HashSet<String>,
    /// Keywords a candidate must match to count as on-topic.
    pub keywords: Vec<String>,
    /// Queries issued against the search API.
    pub search_queries: Vec<String>,
    /// Directory batch files are written to.
    pub output_dir: String,
    pub congress: CongressConfig,
}

/// Settings for the legislative-portal run, which talks to a slower site
/// and therefore carries its own timeouts and retry policy.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CongressConfig {
    pub base_url: String,
    pub search_term: String,
    pub request_timeout: u64,
    /// Pause between result pages, seconds.
    pub search_delay: u64,
    pub max_retries: usize,
    /// Base pause before a retry, seconds.
    pub retry_delay: u64,
    /// Hard cap on result pages walked per run.
    pub max_pages: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            request_timeout: 10,
            search_delay: 2,
            similarity_threshold: 0.85,
            url_similarity_threshold: 0.9,
            trusted_domains: [
                "whitehouse.gov",
                "europa.eu",
                "gov.uk",
                "canada.ca",
                "congress.gov",
                "fda.gov",
                "nist.gov",
                "oecd.org",
                "un.org",
                "weforum.org",
                "brookings.edu",
                "mit.edu",
                "harvard.edu",
                "csis.org",
                "futureoflife.org",
                "pdpc.gov.sg",
                "leg.colorado.gov",
                "gov",
                "edu",
                "org",
                "int",
                "oecd",
                "un",
                "unesco",
                "europa",
                "weforum",
                "brookings",
                "mit",
                "stanford",
                "harvard",
                "oxford",
                "cambridge",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            keywords: [
                "ai policy",
                "artificial intelligence",
                "regulation",
                "guidelines",
                "ethics",
                "governance",
                "framework",
                "legislation",
                "standards",
                "compliance",
                "white paper",
                "report",
                "recommendation",
                "directive",
                "initiative",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            search_queries: [
                "latest AI policy updates government",
                "artificial intelligence regulations 2024",
                "AI governance framework official",
                "international AI policy guidelines",
                "AI ethics regulations updates",
                "global AI policy developments",
                "AI regulatory framework latest",
                "government AI policy documents",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            output_dir: "output".to_string(),
            congress: CongressConfig::default(),
        }
    }
}

impl Default for CongressConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.congress.gov/search".to_string(),
            search_term: "(artificial+intelligence+OR+machine+learning+OR+AI+regulation\
                           +OR+algorithmic+OR+autonomous+systems)"
                .to_string(),
            request_timeout: 30,
            search_delay: 3,
            max_retries: 5,
            retry_delay: 10,
            max_pages: 10,
        }
    }
}

impl ScraperConfig {
    /// Loads configuration, layering `POLICY_` environment variables over an
    /// optional YAML file. Nested keys use `__`, e.g.
    /// `POLICY_CONGRESS__MAX_PAGES=2`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::new(path, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix("POLICY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
