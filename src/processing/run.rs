use crate::crawlers::PolicyCrawler;
use crate::repository::BatchWriter;

/// Runs one crawler to completion and persists everything it admitted as a
/// named batch. Returns the number of records saved; a failed write is
/// logged and reported as zero so the remaining sources still run.
pub async fn crawl_and_save<R>(crawler: &dyn PolicyCrawler, repo: &R, batch: &str) -> usize
where
    R: BatchWriter,
{
    log::info!("Starting crawler for batch {batch}");
    let records = crawler.collect().await;
    log::info!("Collected {} records for batch {batch}", records.len());

    match repo.save_batch(batch, &records) {
        Ok(saved) => {
            log::info!("Saved {saved} records to {batch}");
            saved
        }
        Err(e) => {
            log::error!("Error saving batch {batch}: {e}");
            0
        }
    }
}
