use std::sync::Arc;
use std::time::Duration;

use jobscout_engine::matcher::Matcher;
use jobscout_engine::testing::{posting, MemoryJobStore, MockScorer, MockScraper};

/// Page text long enough to clear the thin-content guard, unique per marker.
fn page_text(marker: &str) -> String {
    format!("{marker} {}", "We are hiring a senior engineer. ".repeat(10))
}

fn matcher(
    store: Arc<MemoryJobStore>,
    scraper: Arc<MockScraper>,
    scorer: Arc<MockScorer>,
) -> Matcher {
    Matcher::new(store, scraper, scorer, Duration::ZERO)
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let store = Arc::new(MemoryJobStore::new());
    let at = page_text("at-threshold");
    let below = page_text("below-threshold");

    let scraper = Arc::new(
        MockScraper::new()
            .on_page("https://jobs.example.com/at", &at)
            .on_page("https://jobs.example.com/below", &below),
    );
    let scorer = Arc::new(
        MockScorer::new()
            .on_description(&at, 40, &["python"])
            .on_description(&below, 39, &[]),
    );

    let mut a = posting("at", Some("https://jobs.example.com/at"));
    a.title = "At threshold".to_string();
    let mut b = posting("below", Some("https://jobs.example.com/below"));
    b.title = "Below threshold".to_string();
    store.seed(&[a, b]);

    let report = matcher(store.clone(), scraper, scorer)
        .match_unprocessed(40, 10)
        .await
        .unwrap();

    assert_eq!(report.total_unprocessed, 2);
    assert_eq!(report.total_scraped, 2);
    assert_eq!(report.total_matched, 1);
    assert_eq!(report.matched_jobs[0].id, "at");

    // Both reached a terminal state regardless of score.
    assert!(store.all().iter().all(|p| p.processed));
}

#[tokio::test]
async fn results_sort_descending_and_stay_stable_on_ties() {
    let store = Arc::new(MemoryJobStore::new());
    let scores = [("j1", 80), ("j2", 95), ("j3", 80), ("j4", 60)];

    let mut scraper = MockScraper::new();
    let mut scorer = MockScorer::new();
    let mut postings = Vec::new();
    for (id, score) in scores {
        let url = format!("https://jobs.example.com/{id}");
        let text = page_text(id);
        scraper = scraper.on_page(&url, &text);
        scorer = scorer.on_description(&text, score, &["python"]);
        postings.push(posting(id, Some(&url)));
    }
    store.seed(&postings);

    let report = matcher(store, Arc::new(scraper), Arc::new(scorer))
        .match_unprocessed(40, 10)
        .await
        .unwrap();

    let order: Vec<&str> = report.matched_jobs.iter().map(|m| m.id.as_str()).collect();
    // The two 80s keep repository order.
    assert_eq!(order, vec!["j2", "j1", "j3", "j4"]);
}

#[tokio::test]
async fn missing_apply_link_is_terminal_without_scraping() {
    let store = Arc::new(MemoryJobStore::new());
    store.seed(&[posting("nolink", None)]);

    let scraper = Arc::new(MockScraper::new());
    let report = matcher(store.clone(), scraper.clone(), Arc::new(MockScorer::new()))
        .match_unprocessed(40, 10)
        .await
        .unwrap();

    assert_eq!(report.total_scraped, 0);
    assert_eq!(report.total_matched, 0);
    assert!(scraper.fetched_urls().is_empty());
    assert!(store.all()[0].processed);
}

#[tokio::test]
async fn failed_or_thin_scrapes_are_terminal() {
    let store = Arc::new(MemoryJobStore::new());
    store.seed(&[
        posting("dead", Some("https://jobs.example.com/dead")),
        posting("thin", Some("https://jobs.example.com/thin")),
    ]);

    // "dead" has no page configured; "thin" returns under 100 chars.
    let scraper = Arc::new(MockScraper::new().on_page("https://jobs.example.com/thin", "Apply now"));

    let report = matcher(store.clone(), scraper, Arc::new(MockScorer::new()))
        .match_unprocessed(40, 10)
        .await
        .unwrap();

    assert_eq!(report.total_scraped, 0);
    assert_eq!(report.total_matched, 0);
    assert!(store.all().iter().all(|p| p.processed));
}

#[tokio::test]
async fn extraction_failure_is_terminal_but_keeps_scraped_text() {
    let store = Arc::new(MemoryJobStore::new());
    let text = page_text("unscored");
    store.seed(&[posting("u1", Some("https://jobs.example.com/u1"))]);

    let scraper = Arc::new(MockScraper::new().on_page("https://jobs.example.com/u1", &text));
    // No verdict configured, so scoring fails.
    let report = matcher(store.clone(), scraper, Arc::new(MockScorer::new()))
        .match_unprocessed(40, 10)
        .await
        .unwrap();

    assert_eq!(report.total_scraped, 1);
    assert_eq!(report.total_matched, 0);

    let stored = &store.all()[0];
    assert!(stored.processed);
    assert_eq!(stored.full_description.as_deref(), Some(text.as_str()));
}

#[tokio::test]
async fn processed_postings_are_never_revisited() {
    let store = Arc::new(MemoryJobStore::new());
    let text = page_text("once");
    store.seed(&[posting("p1", Some("https://jobs.example.com/p1"))]);

    let scraper = Arc::new(MockScraper::new().on_page("https://jobs.example.com/p1", &text));
    let scorer = Arc::new(MockScorer::new().on_description(&text, 90, &["python", "django"]));
    let pipeline = matcher(store.clone(), scraper.clone(), scorer);

    let first = pipeline.match_unprocessed(40, 10).await.unwrap();
    assert_eq!(first.total_matched, 1);

    let second = pipeline.match_unprocessed(40, 10).await.unwrap();
    assert_eq!(second.total_unprocessed, 0);
    assert_eq!(second.total_matched, 0);
    // The page was only fetched on the first run.
    assert_eq!(scraper.fetched_urls().len(), 1);
}

#[tokio::test]
async fn jd_preview_is_capped() {
    let store = Arc::new(MemoryJobStore::new());
    let text = "x".repeat(2000);
    store.seed(&[posting("long", Some("https://jobs.example.com/long"))]);

    let scraper = Arc::new(MockScraper::new().on_page("https://jobs.example.com/long", &text));
    let scorer = Arc::new(MockScorer::new().on_description(&text, 75, &["python"]));

    let report = matcher(store, scraper, scorer)
        .match_unprocessed(40, 10)
        .await
        .unwrap();

    assert_eq!(report.matched_jobs[0].jd_preview.chars().count(), 500);
}
