mod common;

use std::collections::HashSet;

use field2go_core::dataset::{read_dataset, DATASET_HEADER};
use field2go_core::store::InMemoryStore;
use field2go_pipeline::commands::build_dataset;

#[tokio::test]
async fn writes_positives_and_sampled_negatives() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config(dir.path());

    let summary = build_dataset::run(&common::store(), &config).await.unwrap();
    assert_eq!(summary.users, common::USERS);
    assert_eq!(summary.positives, 12);
    // Every user has three unreserved fields left, all of them sampled.
    assert_eq!(summary.negatives, common::USERS * 3);

    let rows = read_dataset(&config.dataset_path).unwrap();
    assert_eq!(rows.len(), summary.positives + summary.negatives);

    let positives: HashSet<(String, String)> = rows
        .iter()
        .filter(|r| r.is_reserved())
        .map(|r| (r.user_id.to_string(), r.field_id.to_string()))
        .collect();
    for row in rows.iter().filter(|r| !r.is_reserved()) {
        let pair = (row.user_id.to_string(), row.field_id.to_string());
        assert!(!positives.contains(&pair), "negative overlaps a positive: {pair:?}");
        assert_eq!(row.date, None);
    }
}

#[tokio::test]
async fn fixed_seed_reproduces_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config(dir.path());

    build_dataset::run(&common::store(), &config).await.unwrap();
    let first = std::fs::read_to_string(&config.dataset_path).unwrap();
    build_dataset::run(&common::store(), &config).await.unwrap();
    let second = std::fs::read_to_string(&config.dataset_path).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_store_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config(dir.path());

    let summary = build_dataset::run(&InMemoryStore::default(), &config)
        .await
        .unwrap();
    assert_eq!(summary.positives + summary.negatives, 0);

    let text = std::fs::read_to_string(&config.dataset_path).unwrap();
    assert_eq!(text.trim_end(), DATASET_HEADER.join(","));
}
