// LLM extraction call sites: skill matching and people extraction.
//
// Both run against the grounding-disabled model configuration and return
// schema-validated objects. Any transport error, malformed output, or schema
// violation surfaces as `Err`; the pipelines skip that one item and continue.

use anyhow::Result;
use async_trait::async_trait;
use llm_client::Llm;
use tracing::info;

use jobscout_common::{truncate_chars, JobScoutError, PeopleExtraction, Person, SkillMatch};

use crate::traits::{PeopleFinder, SkillScorer};

// ---------------------------------------------------------------------------
// Skill matching
// ---------------------------------------------------------------------------

/// LLM input budget for one job description.
const SKILL_MATCH_INPUT_CHARS: usize = 3000;

const SKILL_MATCH_SYSTEM_PROMPT: &str = "You are a job-match analyst. Given a candidate's skill \
list and a job description, report which of the candidate's skills the job mentions, which it \
does not require, and a match score as the percentage of the candidate's skills found in the \
description. Only consider skills from the candidate's list.";

pub struct SkillMatcher {
    llm: Llm,
    skills: Vec<String>,
}

impl SkillMatcher {
    /// `skills` is the externally-configured skill set every posting is
    /// scored against.
    pub fn new(llm: Llm, skills: Vec<String>) -> Self {
        Self { llm, skills }
    }
}

#[async_trait]
impl SkillScorer for SkillMatcher {
    async fn match_job(&self, description: &str) -> Result<SkillMatch> {
        let user_prompt = format!(
            "My skills: {}\n\nJob description:\n{}\n\nAnalyze which of MY skills are mentioned \
             in this job. Calculate match score as percentage of my skills that match. Return \
             matched skills, missing skills, and score.",
            self.skills.join(", "),
            truncate_chars(description, SKILL_MATCH_INPUT_CHARS),
        );

        let result: SkillMatch = self
            .llm
            .extract(SKILL_MATCH_SYSTEM_PROMPT, &user_prompt)
            .await?;

        if !(0..=100).contains(&result.match_score) {
            return Err(JobScoutError::Extraction(format!(
                "match score out of range: {}",
                result.match_score
            ))
            .into());
        }

        info!(
            score = result.match_score,
            matched = result.matched_skills.len(),
            missing = result.missing_skills.len(),
            "Skill match scored"
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// People extraction
// ---------------------------------------------------------------------------

/// LLM input budget for one contact-discovery page.
pub(crate) const PEOPLE_INPUT_CHARS: usize = 6000;

/// Roles worth extracting. Anyone outside this list is noise for outreach.
const RELEVANT_ROLES: &[&str] = &[
    "engineering manager",
    "hiring manager",
    "tech lead",
    "software lead",
    "staff engineer",
    "senior developer",
    "senior software engineer",
    "recruiter",
    "talent acquisition",
    "development manager",
    "delivery manager",
];

const PEOPLE_SYSTEM_PROMPT: &str = "You extract hiring-relevant people from web page text. Only \
include individuals whose stated job role matches the allow-list in the request. Return strict \
structured JSON according to the schema; return an empty list when no one qualifies.";

pub struct PeopleExtractor {
    llm: Llm,
}

impl PeopleExtractor {
    pub fn new(llm: Llm) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl PeopleFinder for PeopleExtractor {
    async fn extract_people(&self, text: &str) -> Result<Vec<Person>> {
        let user_prompt = format!(
            "Extract ALL relevant people from the following text.\n\nONLY include individuals \
             whose job role includes ANY of these:\n- {}\n\nTEXT:\n{}",
            RELEVANT_ROLES.join("\n- "),
            truncate_chars(text, PEOPLE_INPUT_CHARS),
        );

        let response: PeopleExtraction =
            self.llm.extract(PEOPLE_SYSTEM_PROMPT, &user_prompt).await?;

        let people: Vec<Person> = response
            .people
            .into_iter()
            .filter(|p| !p.name.trim().is_empty())
            .collect();

        info!(count = people.len(), "People extracted");
        Ok(people)
    }
}
