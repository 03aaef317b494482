// Collection pipeline: job-board search, dedup against the repository,
// insert what is new.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info};

use jobscout_common::SearchRequest;

use crate::traits::{JobSearchClient, JobStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct CollectOutcome {
    pub status: CollectStatus,
    pub total_found: usize,
    pub added: usize,
    pub duplicates_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CollectOutcome {
    fn failed(error: String) -> Self {
        Self {
            status: CollectStatus::Error,
            total_found: 0,
            added: 0,
            duplicates_skipped: 0,
            error: Some(error),
        }
    }
}

pub struct Collector {
    client: Arc<dyn JobSearchClient>,
    jobs: Arc<dyn JobStore>,
}

impl Collector {
    pub fn new(client: Arc<dyn JobSearchClient>, jobs: Arc<dyn JobStore>) -> Self {
        Self { client, jobs }
    }

    /// Fetch one page of postings and insert those not already stored.
    /// Upstream failures are reported in the outcome rather than propagated,
    /// so a scheduled run always produces a status record.
    pub async fn collect(&self, request: &SearchRequest) -> CollectOutcome {
        info!(
            query = request.query.as_str(),
            region = request.region.as_str(),
            "Collecting jobs"
        );

        let page = match self.client.search(request).await {
            Ok(page) => page,
            Err(e) => {
                error!(query = request.query.as_str(), error = %e, "Job search failed");
                return CollectOutcome::failed(e.to_string());
            }
        };

        match self.insert_new(&page.postings).await {
            Ok(added) => {
                let outcome = CollectOutcome {
                    status: CollectStatus::Success,
                    total_found: page.postings.len(),
                    added,
                    duplicates_skipped: page.postings.len() - added,
                    error: None,
                };
                info!(
                    total_found = outcome.total_found,
                    added = outcome.added,
                    duplicates_skipped = outcome.duplicates_skipped,
                    "Collection complete"
                );
                outcome
            }
            Err(e) => {
                error!(error = %e, "Failed to persist collected jobs");
                CollectOutcome::failed(e.to_string())
            }
        }
    }

    async fn insert_new(&self, postings: &[jobscout_common::JobPosting]) -> Result<usize> {
        let known = self.jobs.list_ids().await?;
        let mut added = 0;

        for posting in postings {
            if known.contains(&posting.id) {
                continue;
            }
            // INSERT OR IGNORE still guards against a concurrent writer
            // landing the same id between list_ids and here.
            if self.jobs.insert_if_absent(posting).await? {
                added += 1;
            }
        }

        Ok(added)
    }
}
