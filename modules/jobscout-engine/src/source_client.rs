// Adzuna job-board API client.
// Free tier: 5,000 requests/month.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use jobscout_common::{
    truncate_chars, JobPosting, JobScoutError, LinkStatus, SearchPage, SearchRequest,
    NOT_AVAILABLE,
};

use crate::traits::JobSearchClient;

const ADZUNA_API_URL: &str = "https://api.adzuna.com/v1/api/jobs";

/// Short-description preview length stored at collection time.
const DESCRIPTION_PREVIEW_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// Provider wire types
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
struct AdzunaResponse {
    #[serde(default)]
    results: Vec<AdzunaResult>,
    #[serde(default)]
    count: u64,
}

#[derive(Debug, serde::Deserialize)]
struct AdzunaResult {
    // Numeric in some regions, string in others.
    id: Option<serde_json::Value>,
    title: Option<String>,
    company: Option<AdzunaCompany>,
    location: Option<AdzunaLocation>,
    #[serde(default)]
    description: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    contract_type: Option<String>,
    category: Option<AdzunaCategory>,
    created: Option<String>,
    redirect_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct AdzunaCompany {
    display_name: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct AdzunaLocation {
    display_name: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct AdzunaCategory {
    label: Option<String>,
}

impl AdzunaResult {
    /// Normalize one provider record into the uniform posting shape.
    /// Records without an id cannot be deduplicated and are dropped.
    fn normalize(self) -> Option<JobPosting> {
        let id = match self.id? {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let apply_link = self.redirect_url.filter(|u| !u.is_empty());
        let link_status = if apply_link.is_some() {
            LinkStatus::Found
        } else {
            LinkStatus::NotFound
        };

        Some(JobPosting {
            id,
            title: self.title.unwrap_or_else(not_available),
            company: self
                .company
                .and_then(|c| c.display_name)
                .unwrap_or_else(not_available),
            location: self
                .location
                .and_then(|l| l.display_name)
                .unwrap_or_else(not_available),
            description: truncate_chars(&self.description, DESCRIPTION_PREVIEW_CHARS).to_string(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            contract_type: self.contract_type.unwrap_or_else(not_available),
            category: self
                .category
                .and_then(|c| c.label)
                .unwrap_or_else(not_available),
            posted_date: self.created.unwrap_or_else(not_available),
            apply_link,
            source: "Adzuna".to_string(),
            link_status,
            full_description: None,
            processed: false,
            collected_at: Utc::now(),
        })
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct AdzunaClient {
    app_id: String,
    app_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl AdzunaClient {
    pub fn new(app_id: &str, app_key: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            app_key: app_key.to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: ADZUNA_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl JobSearchClient for AdzunaClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let url = format!("{}/{}/search/1", self.base_url, request.region);

        info!(
            query = request.query.as_str(),
            region = request.region.as_str(),
            page_size = request.page_size,
            "Adzuna search"
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
                ("what", request.query.as_str()),
                ("results_per_page", &request.page_size.min(50).to_string()),
                ("max_days_old", &request.max_age_days.to_string()),
                ("sort_by", request.sort.as_str()),
            ])
            .send()
            .await
            .context("Adzuna API request failed")?;

        if !response.status().is_success() {
            return Err(JobScoutError::SourceQuery(format!("HTTP {}", response.status())).into());
        }

        let data: AdzunaResponse = response
            .json()
            .await
            .context("Failed to parse Adzuna response")?;

        let raw_count = data.results.len();
        let postings: Vec<JobPosting> = data
            .results
            .into_iter()
            .filter_map(|r| {
                let posting = r.normalize();
                if posting.is_none() {
                    warn!("Dropped Adzuna record without a usable id");
                }
                posting
            })
            .collect();

        info!(
            parsed = postings.len(),
            raw = raw_count,
            total = data.count,
            "Adzuna search complete"
        );

        Ok(SearchPage {
            postings,
            total: data.count,
        })
    }
}
