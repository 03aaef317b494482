pub mod automation;
pub mod collector;
pub mod contacts;
pub mod email_patterns;
pub mod extractor;
pub mod matcher;
pub mod queries;
pub mod scraper;
pub mod source_client;
pub mod traits;
pub mod web_search;

#[cfg(feature = "test-support")]
pub mod testing;
