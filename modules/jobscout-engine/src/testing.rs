// In-memory test doubles for the pipeline trait seams.
//
// Compiled only with the `test-support` feature; the integration tests pull
// them in through a dev-dependency on this crate with the feature enabled.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use jobscout_common::{
    ContactRecord, JobPosting, Person, SearchPage, SearchRequest, SearchResult, SkillMatch,
};

use crate::traits::{
    ContactStore, JobSearchClient, JobStore, PageScraper, PeopleFinder, SkillScorer, WebSearcher,
};

// ---------------------------------------------------------------------------
// Job-board search
// ---------------------------------------------------------------------------

/// Returns a fixed page for every query, or fails every call.
pub struct MockSearchClient {
    page: Option<SearchPage>,
}

impl MockSearchClient {
    pub fn returning(postings: Vec<JobPosting>) -> Self {
        let total = postings.len() as u64;
        Self {
            page: Some(SearchPage { postings, total }),
        }
    }

    pub fn failing() -> Self {
        Self { page: None }
    }
}

#[async_trait]
impl JobSearchClient for MockSearchClient {
    async fn search(&self, _request: &SearchRequest) -> Result<SearchPage> {
        match &self.page {
            Some(page) => Ok(SearchPage {
                postings: page.postings.clone(),
                total: page.total,
            }),
            None => Err(anyhow!("search unavailable")),
        }
    }
}

// ---------------------------------------------------------------------------
// Web search
// ---------------------------------------------------------------------------

/// Serves canned results per query string and records every query issued.
#[derive(Default)]
pub struct MockWebSearcher {
    responses: HashMap<String, Vec<SearchResult>>,
    issued: Mutex<Vec<String>>,
}

impl MockWebSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(mut self, query: &str, urls: &[&str]) -> Self {
        let results = urls
            .iter()
            .map(|u| SearchResult {
                url: u.to_string(),
                title: String::new(),
                snippet: String::new(),
            })
            .collect();
        self.responses.insert(query.to_string(), results);
        self
    }

    pub fn queries_issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.issued.lock().unwrap().push(query.to_string());
        let results = self.responses.get(query).cloned().unwrap_or_default();
        Ok(results.into_iter().take(max_results).collect())
    }
}

// ---------------------------------------------------------------------------
// Page scraping
// ---------------------------------------------------------------------------

/// Serves canned page text per URL and records every fetch.
#[derive(Default)]
pub struct MockScraper {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn fetch_job_page(&self, url: &str) -> Option<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned()
    }

    async fn fetch_page(&self, url: &str) -> Option<String> {
        self.fetch_job_page(url).await
    }
}

// ---------------------------------------------------------------------------
// LLM extraction
// ---------------------------------------------------------------------------

/// Scores keyed by exact description text; unknown text fails the call.
#[derive(Default)]
pub struct MockScorer {
    verdicts: HashMap<String, SkillMatch>,
}

impl MockScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_description(mut self, text: &str, score: i64, matched: &[&str]) -> Self {
        self.verdicts.insert(
            text.to_string(),
            SkillMatch {
                matched_skills: matched.iter().map(|s| s.to_string()).collect(),
                missing_skills: Vec::new(),
                match_score: score,
            },
        );
        self
    }
}

#[async_trait]
impl SkillScorer for MockScorer {
    async fn match_job(&self, description: &str) -> Result<SkillMatch> {
        self.verdicts
            .get(description)
            .cloned()
            .ok_or_else(|| anyhow!("no verdict configured for this description"))
    }
}

/// People keyed by exact page text; unknown text fails the call.
#[derive(Default)]
pub struct MockPeopleFinder {
    people: HashMap<String, Vec<Person>>,
}

impl MockPeopleFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(mut self, text: &str, people: Vec<Person>) -> Self {
        self.people.insert(text.to_string(), people);
        self
    }
}

#[async_trait]
impl PeopleFinder for MockPeopleFinder {
    async fn extract_people(&self, text: &str) -> Result<Vec<Person>> {
        self.people
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow!("no people configured for this text"))
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// Insertion-ordered in-memory job store.
#[derive(Default)]
pub struct MemoryJobStore {
    postings: Mutex<Vec<JobPosting>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload postings without going through the trait.
    pub fn seed(&self, postings: &[JobPosting]) {
        self.postings.lock().unwrap().extend_from_slice(postings);
    }

    pub fn all(&self) -> Vec<JobPosting> {
        self.postings.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.postings.lock().unwrap().len()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn list_ids(&self) -> Result<HashSet<String>> {
        Ok(self
            .postings
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.id.clone())
            .collect())
    }

    async fn insert_if_absent(&self, posting: &JobPosting) -> Result<bool> {
        let mut postings = self.postings.lock().unwrap();
        if postings.iter().any(|p| p.id == posting.id) {
            return Ok(false);
        }
        postings.push(posting.clone());
        Ok(true)
    }

    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<JobPosting>> {
        Ok(self
            .postings
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !p.processed)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, posting: &JobPosting) -> Result<()> {
        let mut postings = self.postings.lock().unwrap();
        match postings.iter_mut().find(|p| p.id == posting.id) {
            Some(existing) => {
                *existing = posting.clone();
                Ok(())
            }
            None => Err(anyhow!("unknown posting id: {}", posting.id)),
        }
    }
}

/// In-memory contact store with the same (name, company) case-insensitive
/// identity as the SQLite repository.
#[derive(Default)]
pub struct MemoryContactStore {
    records: Mutex<Vec<ContactRecord>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<ContactRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

fn identity_key(name: &str, company: Option<&str>) -> (String, String) {
    (
        name.to_lowercase(),
        company.unwrap_or_default().to_lowercase(),
    )
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn upsert(&self, person: &Person, source_url: &str) -> Result<ContactRecord> {
        let now = chrono::Utc::now();
        let key = identity_key(&person.name, person.company.as_deref());
        let mut records = self.records.lock().unwrap();

        if let Some(existing) = records
            .iter_mut()
            .find(|r| identity_key(&r.name, r.company.as_deref()) == key)
        {
            existing.title = Some(person.title.clone());
            existing.location = person.location.clone();
            existing.source_url = Some(source_url.to_string());
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let record = ContactRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: person.name.clone(),
            title: Some(person.title.clone()),
            company: person.company.clone(),
            location: person.location.clone(),
            source_url: Some(source_url.to_string()),
            email: None,
            email_pattern: None,
            email_confidence: None,
            email_attempts: 0,
            last_emailed_at: None,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }
}

/// A posting fixture with sane defaults for pipeline tests.
pub fn posting(id: &str, apply_link: Option<&str>) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: format!("Job {id}"),
        company: "Acme".to_string(),
        location: "Bengaluru".to_string(),
        description: "preview".to_string(),
        salary_min: None,
        salary_max: None,
        contract_type: "N/A".to_string(),
        category: "IT Jobs".to_string(),
        posted_date: "2026-08-18T09:30:00Z".to_string(),
        apply_link: apply_link.map(str::to_string),
        source: "Adzuna".to_string(),
        link_status: if apply_link.is_some() {
            jobscout_common::LinkStatus::Found
        } else {
            jobscout_common::LinkStatus::NotFound
        },
        full_description: None,
        processed: false,
        collected_at: chrono::Utc::now(),
    }
}
