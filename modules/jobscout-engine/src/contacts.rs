// Contact discovery pipeline: query fan-out, web search, scrape, extract
// people, upsert into the contact repository.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::queries::gather_urls;
use crate::traits::{ContactStore, PageScraper, PeopleFinder, WebSearcher};

/// Pages with less text than this rarely name real people; skip them rather
/// than burn an LLM call.
const MIN_PAGE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    Success,
    NoUrls,
}

#[derive(Debug, Serialize)]
pub struct DiscoveredContact {
    pub name: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub source_url: String,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryOutcome {
    pub status: DiscoveryStatus,
    pub company: String,
    pub location: String,
    pub total_found: usize,
    pub managers: Vec<DiscoveredContact>,
}

pub struct ContactDiscovery {
    searcher: Arc<dyn WebSearcher>,
    scraper: Arc<dyn PageScraper>,
    finder: Arc<dyn PeopleFinder>,
    contacts: Arc<dyn ContactStore>,
    /// Pause between page visits.
    contact_delay: Duration,
}

impl ContactDiscovery {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        scraper: Arc<dyn PageScraper>,
        finder: Arc<dyn PeopleFinder>,
        contacts: Arc<dyn ContactStore>,
        contact_delay: Duration,
    ) -> Self {
        Self {
            searcher,
            scraper,
            finder,
            contacts,
            contact_delay,
        }
    }

    /// Find hiring-relevant people for one company. Per-URL failures are
    /// skipped; only repository errors propagate.
    ///
    /// `job_title_hint` is part of the call contract but not yet folded into
    /// the fan-out queries, which stay keyword-driven.
    pub async fn discover(
        &self,
        company: &str,
        location: &str,
        job_title_hint: Option<&str>,
        max_urls: usize,
    ) -> Result<DiscoveryOutcome> {
        info!(company, location, job_title_hint, max_urls, "Discovering contacts");

        let urls = gather_urls(self.searcher.as_ref(), company, location, max_urls).await;

        if urls.is_empty() {
            info!(company, "No candidate URLs found");
            return Ok(DiscoveryOutcome {
                status: DiscoveryStatus::NoUrls,
                company: company.to_string(),
                location: location.to_string(),
                total_found: 0,
                managers: Vec::new(),
            });
        }

        let mut managers = Vec::new();
        let url_count = urls.len();

        for (i, url) in urls.iter().enumerate() {
            let Some(text) = self.scraper.fetch_page(url).await else {
                continue;
            };

            if text.chars().count() < MIN_PAGE_CHARS {
                continue;
            }

            let people = match self.finder.extract_people(&text).await {
                Ok(people) => people,
                Err(e) => {
                    warn!(url = url.as_str(), error = %e, "People extraction failed");
                    continue;
                }
            };

            for person in &people {
                let record = self.contacts.upsert(person, url).await?;
                managers.push(DiscoveredContact {
                    name: record.name,
                    title: record.title.unwrap_or_default(),
                    company: record.company,
                    location: record.location,
                    source_url: record.source_url.unwrap_or_else(|| url.clone()),
                });
            }

            if i + 1 < url_count && !self.contact_delay.is_zero() {
                tokio::time::sleep(self.contact_delay).await;
            }
        }

        info!(company, found = managers.len(), "Contact discovery complete");

        Ok(DiscoveryOutcome {
            status: DiscoveryStatus::Success,
            company: company.to_string(),
            location: location.to_string(),
            total_found: managers.len(),
            managers,
        })
    }
}
