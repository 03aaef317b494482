use std::env;
use std::time::Duration;

/// Skills the matcher scores against when `SKILLS` is not set.
const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "django",
    "flask",
    "fastapi",
    "postgresql",
    "sqlite",
    "aws",
    "docker",
    "react",
    "javascript",
    "typescript",
    "git",
    "github",
    "rest api",
    "ec2",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Adzuna job-board API
    pub adzuna_app_id: String,
    pub adzuna_app_key: String,

    // Serper web search
    pub serper_api_key: String,

    // LLM backend (OpenAI-compatible)
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub model_name: String,
    pub model_temperature: f32,

    // Storage
    pub database_url: String,

    // Matching
    pub skills: Vec<String>,
    pub min_match_score: i64,
    pub region: String,

    // Self-throttle pacing. Fixed inter-item delays are deliberate policy
    // against remote-host and LLM rate limits.
    pub scrape_delay: Duration,
    pub score_delay: Duration,
    pub contact_delay: Duration,

    // Contact discovery
    pub max_contact_urls: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            adzuna_app_id: required_env("ADZUNA_APP_ID"),
            adzuna_app_key: required_env("ADZUNA_APP_KEY"),
            serper_api_key: required_env("SERPER_API_KEY"),
            llm_api_key: required_env("LLM_API_KEY"),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            model_name: env::var("MODEL_NAME")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
            model_temperature: parsed_env("MODEL_TEMPERATURE", 0.3),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/jobscout.db".to_string()),
            skills: skills_from_env(),
            min_match_score: parsed_env("MIN_MATCH_SCORE", 40),
            region: env::var("JOB_REGION").unwrap_or_else(|_| "in".to_string()),
            scrape_delay: Duration::from_millis(parsed_env("SCRAPE_DELAY_MS", 1000)),
            score_delay: Duration::from_secs(parsed_env("SCORE_DELAY_SECS", 5)),
            contact_delay: Duration::from_secs(parsed_env("CONTACT_DELAY_SECS", 2)),
            max_contact_urls: parsed_env("MAX_CONTACT_URLS", 8),
        }
    }

    /// Log the active configuration without leaking credentials.
    pub fn log_redacted(&self) {
        tracing::info!(
            model = self.model_name.as_str(),
            base_url = self.llm_base_url.as_str(),
            database = self.database_url.as_str(),
            region = self.region.as_str(),
            skills = self.skills.len(),
            min_match_score = self.min_match_score,
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number")),
        Err(_) => default,
    }
}

fn skills_from_env() -> Vec<String> {
    match env::var("SKILLS") {
        Ok(raw) => raw
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skills_are_lowercase_and_nonempty() {
        assert!(!DEFAULT_SKILLS.is_empty());
        for skill in DEFAULT_SKILLS {
            assert_eq!(*skill, skill.to_lowercase());
        }
    }
}
