use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobscout_common::{Config, SearchRequest};
use jobscout_engine::automation::Automation;
use jobscout_engine::collector::Collector;
use jobscout_engine::contacts::ContactDiscovery;
use jobscout_engine::email_patterns;
use jobscout_engine::extractor::{PeopleExtractor, SkillMatcher};
use jobscout_engine::matcher::Matcher;
use jobscout_engine::scraper::HttpScraper;
use jobscout_engine::source_client::AdzunaClient;
use jobscout_engine::web_search::SerperSearcher;
use jobscout_store::{ContactRepo, JobRepo};
use llm_client::Llm;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Job discovery, skill matching, and hiring-contact discovery")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch postings for a query and store the new ones
    Collect {
        /// Job title or keywords, e.g. "Python Developer"
        query: String,

        /// Region code override, e.g. "in" or "gb"
        #[arg(long)]
        region: Option<String>,

        /// Page size requested from the job board
        #[arg(long, default_value_t = 20)]
        max_results: u32,
    },

    /// Scrape and score unprocessed postings
    Match {
        /// Minimum match score to include in the output
        #[arg(long)]
        min_score: Option<i64>,

        /// Maximum postings to process this run
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Discover hiring-manager contacts for a company
    Discover {
        /// Company name
        company: String,

        /// Location hint added to the search queries
        #[arg(long, default_value = "")]
        location: String,

        /// Job title the contacts are expected to hire for
        #[arg(long)]
        job_title: Option<String>,

        /// Target number of pages to visit
        #[arg(long)]
        max_urls: Option<usize>,
    },

    /// Collect, match, and discover contacts in one run
    Run {
        query: String,

        #[arg(long)]
        region: Option<String>,

        #[arg(long, default_value_t = 20)]
        max_results: u32,

        #[arg(long)]
        min_score: Option<i64>,

        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long)]
        max_urls: Option<usize>,
    },

    /// Print candidate email patterns for a name at a domain
    Patterns {
        /// Person's display name, e.g. "Rohit Sharma"
        name: String,

        /// Company email domain, e.g. "acme.com"
        domain: String,
    },
}

/// Targets are module paths, so each workspace crate needs its own prefix.
const LOG_DIRECTIVES: &[&str] = &[
    "jobscout_engine=info",
    "jobscout_store=info",
    "jobscout_common=info",
    "llm_client=info",
];

fn with_crate_directives(mut filter: EnvFilter) -> Result<EnvFilter> {
    for directive in LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(with_crate_directives(EnvFilter::from_default_env())?)
        .init();

    let cli = Cli::parse();

    // Pure computation, no config or database needed.
    if let Commands::Patterns { name, domain } = &cli.command {
        for email in email_patterns::patterns_for(name, domain) {
            println!("{email}");
        }
        return Ok(());
    }

    let config = Config::from_env();
    config.log_redacted();

    let pool = jobscout_store::connect(&config.database_url).await?;
    jobscout_store::migrate(&pool).await?;

    let jobs = Arc::new(JobRepo::new(pool.clone()));
    let contacts = Arc::new(ContactRepo::new(pool));

    let llm = Llm::new(&config.llm_api_key, &config.model_name)
        .with_base_url(&config.llm_base_url)
        .with_temperature(config.model_temperature);

    let search_client = Arc::new(AdzunaClient::new(&config.adzuna_app_id, &config.adzuna_app_key));
    let searcher = Arc::new(SerperSearcher::new(&config.serper_api_key));
    let scraper = Arc::new(HttpScraper::new(config.scrape_delay));
    let scorer = Arc::new(SkillMatcher::new(llm.clone(), config.skills.clone()));
    let finder = Arc::new(PeopleExtractor::new(llm));

    let collector = Collector::new(search_client, jobs.clone());
    let matcher = Matcher::new(jobs, scraper.clone(), scorer, config.score_delay);
    let discovery = ContactDiscovery::new(
        searcher,
        scraper,
        finder,
        contacts,
        config.contact_delay,
    );

    match cli.command {
        Commands::Collect {
            query,
            region,
            max_results,
        } => {
            let request = SearchRequest::new(&query, region.as_deref().unwrap_or(&config.region))
                .page_size(max_results);
            let outcome = collector.collect(&request).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Commands::Match { min_score, limit } => {
            let min_score = min_score.unwrap_or(config.min_match_score);
            let report = matcher.match_unprocessed(min_score, limit).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Discover {
            company,
            location,
            job_title,
            max_urls,
        } => {
            let max_urls = max_urls.unwrap_or(config.max_contact_urls);
            let outcome = discovery
                .discover(&company, &location, job_title.as_deref(), max_urls)
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Commands::Run {
            query,
            region,
            max_results,
            min_score,
            limit,
            max_urls,
        } => {
            let request = SearchRequest::new(&query, region.as_deref().unwrap_or(&config.region))
                .page_size(max_results);
            let automation = Automation::new(collector, matcher, discovery);
            let summary = automation
                .run(
                    &request,
                    min_score.unwrap_or(config.min_match_score),
                    limit,
                    max_urls.unwrap_or(config.max_contact_urls),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Patterns { .. } => unreachable!(),
    }

    info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn workspace_events_pass_the_default_filter() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = Capture(buf.clone());

        let filter = with_crate_directives(EnvFilter::default()).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "jobscout_engine::matcher", "job scored");
            tracing::info!(target: "jobscout_store::migrate", "migrations applied");
            tracing::debug!(target: "jobscout_engine::matcher", "too verbose");
            tracing::info!(target: "hyper::client", "unrelated crate");
        });

        let output = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        assert!(output.contains("job scored"));
        assert!(output.contains("migrations applied"));
        assert!(!output.contains("too verbose"));
        assert!(!output.contains("unrelated crate"));
    }
}
