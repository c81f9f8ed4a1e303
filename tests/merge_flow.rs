//! File-level merge behavior across crawler batch files.

mod common;

use common::{TestOutput, record};
use policy_crawlers::processing::merge::merge_batch_files;
use policy_crawlers::repository::{BatchReader, BatchWriter};

#[test]
fn merges_batches_and_drops_cross_source_duplicates() {
    let output = TestOutput::new();
    let repo = output.repo();

    let ai_batch = vec![
        record(
            "https://example.gov/ai-policy?utm_source=newsletter",
            "National AI Strategy",
            "2024-03-20T10:00:00Z",
        ),
        record(
            "https://example.gov/hearings/ai-oversight",
            "AI Oversight Hearing",
            "2024-05-02T09:30:00Z",
        ),
    ];
    let congress_batch = vec![
        // The same strategy document reached through a different tracking
        // link: identity and content keys both collide.
        record(
            "https://example.gov/ai-policy?utm_medium=email",
            "National AI Strategy",
            "2024-04-01T00:00:00Z",
        ),
        record(
            "https://www.congress.gov/bill/118th-congress/house-bill/1234/text",
            "H.R.1234",
            "2024-06-15T12:00:00Z",
        ),
    ];
    repo.save_batch("ai_policy_updates.json", &ai_batch)
        .unwrap();
    repo.save_batch("congress_bills.json", &congress_batch)
        .unwrap();

    let sources = vec![
        "ai_policy_updates.json".to_string(),
        "congress_bills.json".to_string(),
    ];
    let merged_len = merge_batch_files(&repo, &sources, "merged_policy_updates.json").unwrap();
    assert_eq!(merged_len, 3);

    let merged = repo.load_batch("merged_policy_updates.json").unwrap();
    let titles: Vec<&str> = merged.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["H.R.1234", "AI Oversight Hearing", "National AI Strategy"]
    );
}

#[test]
fn skips_missing_and_malformed_batches() {
    let output = TestOutput::new();
    let repo = output.repo();

    let batch = vec![record(
        "https://example.gov/ai-policy",
        "National AI Strategy",
        "2024-03-20T10:00:00Z",
    )];
    repo.save_batch("ai_policy_updates.json", &batch).unwrap();
    std::fs::write(output.path().join("congress_bills.json"), "{ not json").unwrap();

    let sources = vec![
        "ai_policy_updates.json".to_string(),
        "congress_bills.json".to_string(),
        "never_written.json".to_string(),
    ];
    let merged_len = merge_batch_files(&repo, &sources, "merged_policy_updates.json").unwrap();
    assert_eq!(merged_len, 1);

    let merged = repo.load_batch("merged_policy_updates.json").unwrap();
    assert_eq!(merged[0].title, "National AI Strategy");
}

#[test]
fn merging_no_sources_yields_an_empty_file() {
    let output = TestOutput::new();
    let repo = output.repo();

    let merged_len = merge_batch_files(&repo, &[], "merged_policy_updates.json").unwrap();
    assert_eq!(merged_len, 0);

    let merged = repo.load_batch("merged_policy_updates.json").unwrap();
    assert!(merged.is_empty());
}
