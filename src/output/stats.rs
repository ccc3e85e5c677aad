//! Crawl report and console statistics
//!
//! A `CrawlReport` is the in-memory result of one crawl run: the analyzed
//! pages plus counters describing what happened to every dispatched URL.

use crate::state::Page;
use crate::FetchError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Result of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed as given
    pub seed: String,

    /// Analyzed pages, in completion order
    pub pages: Vec<Page>,

    /// URLs dispatched to a worker
    pub urls_crawled: usize,

    /// URLs still waiting when the crawl stopped (0 after a full drain)
    pub urls_queued: usize,

    /// Fetches that answered without a `200` HTML body
    pub ignored: u64,

    /// Redirects whose target had already been crawled
    pub duplicate_redirects: u64,

    /// Fetches whose body was empty
    pub empty_pages: u64,

    /// Documents that could not be analyzed
    pub analysis_failures: u64,

    /// Classified fetch failures by kind
    pub failures: HashMap<FetchError, u64>,

    /// True if the crawl deadline cut the run short
    pub timed_out: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Total classified fetch failures
    pub fn failure_count(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Fetch failures plus empty bodies
    pub fn bad_pages(&self) -> u64 {
        self.failure_count() + self.empty_pages
    }

    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Looks up an analyzed page by URL
    pub fn page(&self, url: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.url() == url)
    }
}

/// Prints the report to stdout
///
/// # Arguments
///
/// * `report` - The report to display
/// * `verbose` - Also list every page with its description and keywords
pub fn print_report(report: &CrawlReport, verbose: bool) {
    println!("Crawled {} pages.", report.urls_crawled);
    println!("{} pages in queue.", report.urls_queued);
    println!();

    println!("Overview:");
    println!("  Seed: {}", report.seed);
    println!("  Pages analyzed: {}", report.pages.len());
    println!("  Not HTML / not 200: {}", report.ignored);
    if report.duplicate_redirects > 0 {
        println!("  Redirects to crawled pages: {}", report.duplicate_redirects);
    }
    println!("  Bad pages: {}", report.bad_pages());
    println!("  Analysis failures: {}", report.analysis_failures);
    println!(
        "  Elapsed: {:.1}s",
        report.elapsed().num_milliseconds() as f64 / 1000.0
    );
    if report.timed_out {
        println!("  Stopped by crawl deadline");
    }
    println!();

    if report.failure_count() > 0 {
        println!("Error Summary:");
        for kind in FetchError::ALL {
            if let Some(count) = report.failures.get(&kind) {
                println!("  {}: {}", kind.label(), count);
            }
        }
        println!();
    }

    if verbose {
        for page in &report.pages {
            println!("{}", page.url());
            if !page.meta_description().is_empty() {
                println!("  {}", page.meta_description());
            }
            let words: Vec<String> = page
                .key_words()
                .iter()
                .map(|(word, count)| format!("{} ({})", word, count))
                .collect();
            println!("  Keywords: {}", words.join(", "));
        }
    }
}
