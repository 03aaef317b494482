// Matching pipeline: drain unprocessed postings, scrape the full description,
// score it against the configured skills, and persist the result.
//
// Every posting visited is marked processed exactly once, committed
// immediately, so a crash mid-run never causes rework of finished items.
// Unscoreable postings (no link, dead page, thin content, failed extraction)
// are terminal: processed without a match.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use jobscout_common::{truncate_chars, JobPosting, MatchedJob};

use crate::traits::{JobStore, PageScraper, SkillScorer};

/// Scraped text shorter than this is treated as a failed scrape; block pages
/// and empty shells fall under it.
const MIN_SCRAPE_CHARS: usize = 100;

/// Description preview length carried on a match result.
const JD_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub total_unprocessed: usize,
    pub total_scraped: usize,
    pub total_matched: usize,
    pub matched_jobs: Vec<MatchedJob>,
}

pub struct Matcher {
    jobs: Arc<dyn JobStore>,
    scraper: Arc<dyn PageScraper>,
    scorer: Arc<dyn SkillScorer>,
    /// Pause after each scored posting, pacing the LLM provider.
    score_delay: Duration,
}

impl Matcher {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        scraper: Arc<dyn PageScraper>,
        scorer: Arc<dyn SkillScorer>,
        score_delay: Duration,
    ) -> Self {
        Self {
            jobs,
            scraper,
            scorer,
            score_delay,
        }
    }

    /// Process up to `limit` unprocessed postings and return the ones scoring
    /// at or above `min_score`, best first.
    pub async fn match_unprocessed(&self, min_score: i64, limit: u32) -> Result<MatchReport> {
        let pending = self.jobs.list_unprocessed(limit).await?;
        info!(
            pending = pending.len(),
            min_score, "Matching unprocessed jobs"
        );

        let total_unprocessed = pending.len();
        let mut total_scraped = 0;
        let mut matched_jobs = Vec::new();

        for mut posting in pending {
            let Some(apply_link) = posting.apply_link.clone() else {
                info!(id = posting.id.as_str(), "No apply link, marking processed");
                posting.processed = true;
                self.jobs.update(&posting).await?;
                continue;
            };

            let Some(text) = self.scraper.fetch_job_page(&apply_link).await else {
                posting.processed = true;
                self.jobs.update(&posting).await?;
                continue;
            };

            if text.chars().count() < MIN_SCRAPE_CHARS {
                warn!(
                    id = posting.id.as_str(),
                    chars = text.chars().count(),
                    "Scraped content too short to score"
                );
                posting.processed = true;
                self.jobs.update(&posting).await?;
                continue;
            }

            total_scraped += 1;
            posting.full_description = Some(text.clone());

            let verdict = match self.scorer.match_job(&text).await {
                Ok(v) => v,
                Err(e) => {
                    warn!(id = posting.id.as_str(), error = %e, "Skill match failed");
                    posting.processed = true;
                    self.jobs.update(&posting).await?;
                    continue;
                }
            };

            posting.processed = true;
            self.jobs.update(&posting).await?;

            info!(
                id = posting.id.as_str(),
                title = posting.title.as_str(),
                score = verdict.match_score,
                "Job scored"
            );

            if verdict.match_score >= min_score {
                matched_jobs.push(to_matched(&posting, &apply_link, verdict));
            }

            if !self.score_delay.is_zero() {
                tokio::time::sleep(self.score_delay).await;
            }
        }

        // Stable sort keeps repository order among equal scores.
        matched_jobs.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        info!(
            total_unprocessed,
            total_scraped,
            total_matched = matched_jobs.len(),
            "Matching complete"
        );

        Ok(MatchReport {
            total_unprocessed,
            total_scraped,
            total_matched: matched_jobs.len(),
            matched_jobs,
        })
    }
}

fn to_matched(
    posting: &JobPosting,
    apply_link: &str,
    verdict: jobscout_common::SkillMatch,
) -> MatchedJob {
    let jd_preview = posting
        .full_description
        .as_deref()
        .map(|d| truncate_chars(d, JD_PREVIEW_CHARS).to_string())
        .unwrap_or_default();

    MatchedJob {
        id: posting.id.clone(),
        title: posting.title.clone(),
        company: posting.company.clone(),
        location: posting.location.clone(),
        apply_link: apply_link.to_string(),
        posted_date: posting.posted_date.clone(),
        salary_min: posting.salary_min,
        salary_max: posting.salary_max,
        category: posting.category.clone(),
        match_score: verdict.match_score,
        matched_skills: verdict.matched_skills,
        missing_skills: verdict.missing_skills,
        jd_preview,
    }
}
