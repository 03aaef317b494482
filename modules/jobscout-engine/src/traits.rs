// Trait abstractions for pipeline dependencies.
//
// Every external collaborator sits behind one of these seams: the job-board
// API, web search, page scraping, LLM extraction, and the two repositories.
// The pipelines only see the traits, which enables deterministic testing
// with the mocks in `testing` — no network, no live LLM.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use jobscout_common::{
    ContactRecord, JobPosting, Person, SearchPage, SearchRequest, SearchResult, SkillMatch,
};

// ---------------------------------------------------------------------------
// Job-board search
// ---------------------------------------------------------------------------

#[async_trait]
pub trait JobSearchClient: Send + Sync {
    /// Query the job board and return normalized postings plus the
    /// provider-reported total.
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage>;
}

// ---------------------------------------------------------------------------
// Web search
// ---------------------------------------------------------------------------

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

// ---------------------------------------------------------------------------
// Page scraping
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Job-posting mode: stricter element stripping, capped output.
    /// `None` on any transport failure, non-200 status, or empty content.
    async fn fetch_job_page(&self, url: &str) -> Option<String>;

    /// Generic mode, used for contact-discovery pages.
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// LLM extraction
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SkillScorer: Send + Sync {
    /// Score a job description against the configured skill set.
    async fn match_job(&self, description: &str) -> Result<SkillMatch>;
}

#[async_trait]
pub trait PeopleFinder: Send + Sync {
    /// Extract hiring-relevant people from scraped page text.
    async fn extract_people(&self, text: &str) -> Result<Vec<Person>>;
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list_ids(&self) -> Result<HashSet<String>>;
    async fn insert_if_absent(&self, posting: &JobPosting) -> Result<bool>;
    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<JobPosting>>;
    async fn update(&self, posting: &JobPosting) -> Result<()>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn upsert(&self, person: &Person, source_url: &str) -> Result<ContactRecord>;
}

// ---------------------------------------------------------------------------
// Trait impls for the SQLite repositories
// ---------------------------------------------------------------------------

#[async_trait]
impl JobStore for jobscout_store::JobRepo {
    async fn list_ids(&self) -> Result<HashSet<String>> {
        self.list_ids().await
    }

    async fn insert_if_absent(&self, posting: &JobPosting) -> Result<bool> {
        self.insert_if_absent(posting).await
    }

    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<JobPosting>> {
        self.list_unprocessed(limit).await
    }

    async fn update(&self, posting: &JobPosting) -> Result<()> {
        self.update(posting).await
    }
}

#[async_trait]
impl ContactStore for jobscout_store::ContactRepo {
    async fn upsert(&self, person: &Person, source_url: &str) -> Result<ContactRecord> {
        self.upsert(person, source_url).await
    }
}
