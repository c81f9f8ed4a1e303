use std::env;
use std::time::Instant;

use policy_crawlers::crawlers::ai_policy::AiPolicyCrawler;
use policy_crawlers::crawlers::congress::CongressCrawler;
use policy_crawlers::models::config::ScraperConfig;
use policy_crawlers::processing::merge::merge_batch_files;
use policy_crawlers::processing::run::crawl_and_save;
use policy_crawlers::repository::JsonBatchRepository;

const AI_POLICY_BATCH: &str = "ai_policy_updates.json";
const CONGRESS_BATCH: &str = "congress_bills.json";
const MERGED_BATCH: &str = "merged_policy_updates.json";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config_path = env::var("POLICY_CONFIG").unwrap_or_else(|_| "policy.yaml".to_string());
    let config = match ScraperConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    let repo = JsonBatchRepository::new(&config.output_dir);

    let start = Instant::now();

    let ai_crawler = match AiPolicyCrawler::new(config.clone()) {
        Ok(crawler) => crawler,
        Err(e) => {
            log::error!("Failed to start AI policy crawler: {e}");
            std::process::exit(1);
        }
    };
    crawl_and_save(&ai_crawler, &repo, AI_POLICY_BATCH).await;

    let congress_crawler = match CongressCrawler::new(&config) {
        Ok(crawler) => crawler,
        Err(e) => {
            log::error!("Failed to start Congress crawler: {e}");
            std::process::exit(1);
        }
    };
    crawl_and_save(&congress_crawler, &repo, CONGRESS_BATCH).await;

    let sources = vec![AI_POLICY_BATCH.to_string(), CONGRESS_BATCH.to_string()];
    if let Err(e) = merge_batch_files(&repo, &sources, MERGED_BATCH) {
        log::error!("Failed to merge batches: {e}");
        std::process::exit(1);
    }

    log::info!(
        "Scraping process completed in {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
}
