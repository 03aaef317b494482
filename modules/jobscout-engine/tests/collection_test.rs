use std::sync::Arc;

use jobscout_common::SearchRequest;
use jobscout_engine::collector::{CollectStatus, Collector};
use jobscout_engine::testing::{posting, MemoryJobStore, MockSearchClient};

#[tokio::test]
async fn collection_is_idempotent() {
    let postings = vec![
        posting("j1", Some("https://jobs.example.com/j1")),
        posting("j2", Some("https://jobs.example.com/j2")),
        posting("j3", None),
    ];
    let client = Arc::new(MockSearchClient::returning(postings));
    let store = Arc::new(MemoryJobStore::new());
    let collector = Collector::new(client, store.clone());

    let request = SearchRequest::new("python developer", "in");

    let first = collector.collect(&request).await;
    assert_eq!(first.status, CollectStatus::Success);
    assert_eq!(first.total_found, 3);
    assert_eq!(first.added, 3);
    assert_eq!(first.duplicates_skipped, 0);

    let second = collector.collect(&request).await;
    assert_eq!(second.status, CollectStatus::Success);
    assert_eq!(second.total_found, 3);
    assert_eq!(second.added, 0);
    assert_eq!(second.duplicates_skipped, 3);

    assert_eq!(store.count(), 3);
}

#[tokio::test]
async fn counts_always_reconcile() {
    let client = Arc::new(MockSearchClient::returning(vec![
        posting("a", None),
        posting("b", None),
    ]));
    let store = Arc::new(MemoryJobStore::new());
    let collector = Collector::new(client, store);

    let outcome = collector
        .collect(&SearchRequest::new("rust engineer", "gb"))
        .await;

    assert_eq!(outcome.added + outcome.duplicates_skipped, outcome.total_found);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn upstream_failure_reports_error_status() {
    let client = Arc::new(MockSearchClient::failing());
    let store = Arc::new(MemoryJobStore::new());
    let collector = Collector::new(client, store.clone());

    let outcome = collector
        .collect(&SearchRequest::new("python developer", "in"))
        .await;

    assert_eq!(outcome.status, CollectStatus::Error);
    assert_eq!(outcome.total_found, 0);
    assert_eq!(outcome.added, 0);
    assert!(outcome.error.is_some());
    assert_eq!(store.count(), 0);
}
