//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with single-hop redirects and a content-type gate
//! - Classification of fetch failures
//! - HTML parsing and keyword analysis
//! - Worker pool coordination over the shared frontier

mod analyzer;
mod classify;
mod coordinator;
mod fetcher;
mod parser;

pub use analyzer::{good_word, rank_keywords, MAX_KEY_WORDS};
pub use classify::classify;
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, is_bad_page, FetchResult, Fetched, Fetcher};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier with the canonical form of `seed`
/// 3. Let the worker pool fetch, analyze and follow links until the frontier drains
/// 4. Return the collected pages and counters
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (possibly with zero pages)
/// * `Err(CrawlerError)` - The crawl could not be set up
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, CrawlerError> {
    run_crawl(config, seed).await
}
