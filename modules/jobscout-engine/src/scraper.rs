// HTTP page scraper with Readability text extraction.
//
// Two call shapes share one fetch/strip/truncate core: job-posting pages get
// a stricter element-removal list than generic contact-discovery pages.
// Every failure path collapses to `None` — transport errors never reach the
// pipelines.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{info, warn};

use jobscout_common::truncate_chars;

use crate::traits::PageScraper;

/// Job pages feed the 3,000-char skill-match budget; contact pages feed the
/// 6,000-char people budget, so generic mode keeps more text around.
const JOB_PAGE_CAP_CHARS: usize = 5000;
const GENERIC_CAP_CHARS: usize = 8000;

/// Boilerplate regions stripped before text extraction. Job pages also drop
/// aside/iframe blocks, which on job boards are ads and related-listing rails.
const JOB_PAGE_IGNORE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];
const GENERIC_IGNORE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "noscript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    JobPosting,
    Generic,
}

impl ScrapeMode {
    fn ignore_tags(&self) -> &'static [&'static str] {
        match self {
            ScrapeMode::JobPosting => JOB_PAGE_IGNORE_TAGS,
            ScrapeMode::Generic => GENERIC_IGNORE_TAGS,
        }
    }

    fn max_chars(&self) -> usize {
        match self {
            ScrapeMode::JobPosting => JOB_PAGE_CAP_CHARS,
            ScrapeMode::Generic => GENERIC_CAP_CHARS,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ScrapeMode::JobPosting => "job_posting",
            ScrapeMode::Generic => "generic",
        }
    }
}

pub struct HttpScraper {
    http: reqwest::Client,
    /// Post-fetch self-throttle against the remote host.
    delay: Duration,
}

impl HttpScraper {
    pub fn new(delay: Duration) -> Self {
        let mut headers = HeaderMap::new();
        // Browser-like request signature to reduce block rate.
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        Self {
            http: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(15))
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .expect("Failed to build HTTP client"),
            delay,
        }
    }

    async fn fetch(&self, url: &str, mode: ScrapeMode) -> Option<String> {
        match url::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => {
                warn!(url, scheme = parsed.scheme(), "Refusing non-http(s) URL");
                return None;
            }
            Err(e) => {
                warn!(url, error = %e, "Invalid URL");
                return None;
            }
        }

        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, mode = mode.as_str(), error = %e, "Scrape request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url, mode = mode.as_str(), status = %response.status(), "Non-success status");
            return None;
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "Failed to read response body");
                return None;
            }
        };

        let text = extract_text(&html, url, mode);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if text.is_empty() {
            warn!(url, mode = mode.as_str(), "Empty content after extraction");
            return None;
        }

        info!(url, mode = mode.as_str(), chars = text.len(), "Scraped successfully");
        Some(text)
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn fetch_job_page(&self, url: &str) -> Option<String> {
        self.fetch(url, ScrapeMode::JobPosting).await
    }

    async fn fetch_page(&self, url: &str) -> Option<String> {
        self.fetch(url, ScrapeMode::Generic).await
    }
}

/// Readability extraction with the mode's element-removal list, then line
/// cleanup and the mode's output cap.
fn extract_text(html: &str, url: &str, mode: ScrapeMode) -> String {
    let parsed_url = url::Url::parse(url).ok();
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Markdown,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: Some(mode.ignore_tags()),
    };

    let text = transform_content_input(input, &config);
    let cleaned = clean_lines(&text);

    truncate_chars(&cleaned, mode.max_chars()).to_string()
}

/// Trim every line and drop whitespace-only ones.
fn clean_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_lines_collapses_blank_lines() {
        let raw = "  Senior Engineer  \n\n   \n\tRemote\n";
        assert_eq!(clean_lines(raw), "Senior Engineer\nRemote");
    }

    #[test]
    fn generic_cap_covers_the_people_extraction_budget() {
        assert!(ScrapeMode::Generic.max_chars() >= crate::extractor::PEOPLE_INPUT_CHARS);
        assert!(ScrapeMode::Generic.max_chars() > ScrapeMode::JobPosting.max_chars());

        let long = "page text ".repeat(1000);
        let capped = truncate_chars(&long, ScrapeMode::Generic.max_chars());
        assert_eq!(capped.chars().count(), GENERIC_CAP_CHARS);
    }

    #[test]
    fn job_mode_strips_more_tags_than_generic() {
        assert!(ScrapeMode::JobPosting.ignore_tags().contains(&"aside"));
        assert!(ScrapeMode::JobPosting.ignore_tags().contains(&"iframe"));
        assert!(!ScrapeMode::Generic.ignore_tags().contains(&"aside"));
        for tag in GENERIC_IGNORE_TAGS {
            assert!(JOB_PAGE_IGNORE_TAGS.contains(tag));
        }
    }

    #[tokio::test]
    async fn rejects_non_http_urls_without_network() {
        let scraper = HttpScraper::new(Duration::ZERO);
        assert_eq!(scraper.fetch_job_page("ftp://example.com/jd").await, None);
        assert_eq!(scraper.fetch_page("not a url").await, None);
    }
}
