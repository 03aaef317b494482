// End-to-end run: collect, match, discover contacts, one query.

use serde::Serialize;
use tracing::info;

use anyhow::Result;

use jobscout_common::SearchRequest;

use crate::collector::Collector;
use crate::contacts::ContactDiscovery;
use crate::matcher::Matcher;

#[derive(Debug, Serialize)]
pub struct AutomationSummary {
    pub query: String,
    pub jobs_found: usize,
    pub jobs_added: usize,
    pub jobs_matched: usize,
    pub contacts_found: usize,
}

pub struct Automation {
    collector: Collector,
    matcher: Matcher,
    discovery: ContactDiscovery,
}

impl Automation {
    pub fn new(collector: Collector, matcher: Matcher, discovery: ContactDiscovery) -> Self {
        Self {
            collector,
            matcher,
            discovery,
        }
    }

    /// Run all three stages for one query. Each stage runs regardless of the
    /// previous stage's yield; a zero-result collection still matches the
    /// backlog, and an empty match set still attempts contact discovery.
    pub async fn run(
        &self,
        request: &SearchRequest,
        min_score: i64,
        match_limit: u32,
        max_urls: usize,
    ) -> Result<AutomationSummary> {
        let collected = self.collector.collect(request).await;

        let report = self.matcher.match_unprocessed(min_score, match_limit).await?;

        // Contact discovery reuses the search query as the company name.
        // Resolving companies from the matched postings instead would be the
        // natural refinement once matches carry reliable company fields.
        let discovery = self
            .discovery
            .discover(&request.query, &request.region, None, max_urls)
            .await?;

        let summary = AutomationSummary {
            query: request.query.clone(),
            jobs_found: collected.total_found,
            jobs_added: collected.added,
            jobs_matched: report.total_matched,
            contacts_found: discovery.total_found,
        };

        info!(
            query = summary.query.as_str(),
            jobs_found = summary.jobs_found,
            jobs_added = summary.jobs_added,
            jobs_matched = summary.jobs_matched,
            contacts_found = summary.contacts_found,
            "Automation run complete"
        );

        Ok(summary)
    }
}
