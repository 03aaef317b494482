// Query fan-out for contact discovery.
//
// Each role keyword expands into four query variants combined with the
// company and location. URL gathering walks the queries in order and stops
// as soon as enough unique URLs have accumulated, so later keywords are
// only searched when the earlier ones come up short.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::traits::WebSearcher;

/// Roles whose pages tend to name the people doing the hiring.
const HIRING_MANAGER_KEYWORDS: &[&str] = &[
    "engineering manager",
    "software engineering manager",
    "tech lead",
    "technical lead",
    "hiring manager",
    "delivery manager",
    "software manager",
    "development manager",
    "engineering leadership",
];

/// Per-query cap on web-search results.
const RESULTS_PER_QUERY: usize = 5;

/// Expand the keyword templates into concrete search queries, deduplicated
/// while preserving generation order.
pub fn build_queries(company: &str, location: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut queries = Vec::new();

    for kw in HIRING_MANAGER_KEYWORDS {
        for variant in [
            format!("{company} {kw} {location}"),
            format!("{company} {kw} {location} contact"),
            format!("{company} {kw} {location} email"),
            format!("{company} {kw} {location} team"),
        ] {
            if seen.insert(variant.clone()) {
                queries.push(variant);
            }
        }
    }

    queries
}

/// Run the fan-out queries against the web searcher and collect unique URLs,
/// in discovery order, until `max_urls` is reached or the queries run out.
/// A failed query logs and contributes nothing.
pub async fn gather_urls(
    searcher: &dyn WebSearcher,
    company: &str,
    location: &str,
    max_urls: usize,
) -> Vec<String> {
    let queries = build_queries(company, location);
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for query in &queries {
        if urls.len() >= max_urls {
            break;
        }

        let results = match searcher.search(query, RESULTS_PER_QUERY).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query = query.as_str(), error = %e, "Web search failed, skipping query");
                continue;
            }
        };

        for result in results {
            if result.url.is_empty() {
                continue;
            }
            if seen.insert(result.url.clone()) {
                urls.push(result.url);
                if urls.len() >= max_urls {
                    break;
                }
            }
        }
    }

    info!(
        company,
        location,
        urls = urls.len(),
        max_urls,
        "Gathered contact-discovery URLs"
    );
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_variants_per_keyword() {
        let queries = build_queries("Acme", "Bengaluru");
        assert_eq!(queries.len(), HIRING_MANAGER_KEYWORDS.len() * 4);
        assert!(queries.contains(&"Acme engineering manager Bengaluru".to_string()));
        assert!(queries.contains(&"Acme engineering manager Bengaluru contact".to_string()));
        assert!(queries.contains(&"Acme engineering manager Bengaluru email".to_string()));
        assert!(queries.contains(&"Acme engineering manager Bengaluru team".to_string()));
    }

    #[test]
    fn queries_are_unique_and_ordered() {
        let queries = build_queries("Acme", "Remote");
        let unique: HashSet<_> = queries.iter().collect();
        assert_eq!(unique.len(), queries.len());
        // First keyword's bare variant leads the list.
        assert_eq!(queries[0], "Acme engineering manager Remote");
    }
}
