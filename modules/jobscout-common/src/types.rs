use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sentinel for provider fields that were absent from the upstream payload.
/// Normalized records always carry it instead of omitting the field.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Job postings
// ---------------------------------------------------------------------------

/// Whether the provider supplied a usable apply URL for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Found,
    NotFound,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Found => "found",
            LinkStatus::NotFound => "not_found",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "found" => LinkStatus::Found,
            _ => LinkStatus::NotFound,
        }
    }
}

/// One job-board listing, normalized from the provider's shape.
///
/// `id` is the provider-assigned identifier and the dedup key. A posting is
/// created once by the collection pipeline and mutated only by the matching
/// pipeline, which fills `full_description` and flips `processed` exactly
/// once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Short description preview (first 300 chars of the provider text).
    pub description: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub contract_type: String,
    pub category: String,
    /// Provider-formatted date string; not guaranteed parseable.
    pub posted_date: String,
    pub apply_link: Option<String>,
    pub source: String,
    pub link_status: LinkStatus,
    /// Full scraped description. Absent until the matching pipeline scrapes
    /// the apply link.
    pub full_description: Option<String>,
    /// Work-queue marker: true once the matching pipeline has reached a
    /// terminal outcome for this posting.
    pub processed: bool,
    pub collected_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Source query client contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Date,
    Relevance,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Date => "date",
            SortOrder::Relevance => "relevance",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    /// Provider country code ("in", "us", "gb", ...).
    pub region: String,
    pub page_size: u32,
    pub max_age_days: u32,
    pub sort: SortOrder,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            region: region.into(),
            page_size: 20,
            max_age_days: 7,
            sort: SortOrder::Date,
        }
    }

    pub fn page_size(mut self, n: u32) -> Self {
        self.page_size = n.min(50);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub postings: Vec<JobPosting>,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Web search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

// ---------------------------------------------------------------------------
// LLM extraction targets
// ---------------------------------------------------------------------------

/// Skill-match verdict for one posting. Produced by the extraction gateway,
/// never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SkillMatch {
    /// Skills from the candidate's profile found in the job description
    pub matched_skills: Vec<String>,
    /// Skills from the candidate's profile not required by the job
    pub missing_skills: Vec<String>,
    /// Match percentage, 0-100
    pub match_score: i64,
}

/// One person extracted from a scraped page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    pub name: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
}

/// What the LLM returns for a people-extraction call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PeopleExtraction {
    #[serde(default)]
    pub people: Vec<Person>,
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// A stored hiring-manager contact. Identity for upsert purposes is the
/// case-insensitive (name, company) pair; `id` is a storage surrogate.
/// Email fields are placeholders for a future outreach capability and stay
/// at their null/zero defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub source_url: Option<String>,
    pub email: Option<String>,
    pub email_pattern: Option<String>,
    pub email_confidence: Option<i64>,
    pub email_attempts: i64,
    pub last_emailed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Matching pipeline output
// ---------------------------------------------------------------------------

/// One posting that passed the score threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub apply_link: String,
    pub posted_date: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub category: String,
    pub match_score: i64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// First 500 chars of the scraped description.
    pub jd_preview: String,
}
