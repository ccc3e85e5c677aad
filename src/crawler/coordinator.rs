//! Crawler coordinator - main crawl orchestration logic
//!
//! This module owns the worker pool. Each worker repeatedly:
//! - Takes a lease on the next URL from the frontier
//! - Fetches it
//! - Discards bad pages and non-HTML answers
//! - Analyzes the document and offers every normalized link back to the frontier
//! - Records the outcome, then releases the lease
//!
//! The run ends when the frontier is drained (nothing pending, nothing in
//! flight), when the dispatch limit is reached, or when the crawl deadline passes.

use crate::config::{validate, Config};
use crate::crawler::analyzer::rank_keywords;
use crate::crawler::fetcher::{is_bad_page, Fetched, Fetcher};
use crate::crawler::parser::parse_html;
use crate::output::CrawlReport;
use crate::state::{Frontier, Page};
use crate::url::{canonicalize, normalize_link, LinkRules};
use crate::{CrawlerError, FetchError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// What happened to one dispatched URL
#[derive(Debug)]
enum Outcome {
    Analyzed(Page),
    Ignored,
    Duplicate,
    Empty,
    Failed(FetchError),
    Unparseable,
}

/// Results accumulated by the workers
#[derive(Debug, Default)]
struct Tally {
    pages: Vec<Page>,
    ignored: u64,
    duplicate_redirects: u64,
    empty_pages: u64,
    analysis_failures: u64,
    failures: HashMap<FetchError, u64>,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Analyzed(page) => self.pages.push(page),
            Outcome::Ignored => self.ignored += 1,
            Outcome::Duplicate => self.duplicate_redirects += 1,
            Outcome::Empty => self.empty_pages += 1,
            Outcome::Failed(kind) => *self.failures.entry(kind).or_insert(0) += 1,
            Outcome::Unparseable => self.analysis_failures += 1,
        }
    }
}

/// State shared by every worker
struct Shared {
    frontier: Frontier,
    fetcher: Fetcher,
    rules: LinkRules,
    tally: Mutex<Tally>,
    processed: AtomicUsize,
    start: Instant,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    shared: Arc<Shared>,
    seed: String,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - The URL the crawl starts from
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlerError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config, seed: &str) -> Result<Self, CrawlerError> {
        validate(&config)?;

        let fetcher = Fetcher::new(&config)?;
        let rules = LinkRules::new(&config.filter);
        let frontier = Frontier::new(rules.clone(), config.crawler.max_pages);

        Ok(Self {
            config: Arc::new(config),
            shared: Arc::new(Shared {
                frontier,
                fetcher,
                rules,
                tally: Mutex::new(Tally::default()),
                processed: AtomicUsize::new(0),
                start: Instant::now(),
            }),
            seed: seed.to_string(),
        })
    }

    /// Runs the crawl to completion
    ///
    /// A seed that cannot be fetched is not an error: the run simply ends with
    /// zero analyzed pages and truthful counters.
    pub async fn run(self) -> Result<CrawlReport, CrawlerError> {
        let started_at = Utc::now();
        let seed = canonicalize(self.seed.trim());

        tracing::info!(
            "Starting crawl of {} with {} workers",
            seed,
            self.config.crawler.workers
        );

        if !self.shared.frontier.offer(&seed) {
            tracing::warn!("Seed {} refused by the link filter", seed);
        }

        let mut workers = JoinSet::new();
        for id in 0..self.config.crawler.workers {
            workers.spawn(worker(Arc::clone(&self.shared), id));
        }

        let timed_out = match self.config.crawler.crawl_deadline {
            Some(secs) => {
                let deadline = Duration::from_secs(secs);
                tokio::time::timeout(deadline, join_workers(&mut workers))
                    .await
                    .is_err()
            }
            None => {
                join_workers(&mut workers).await;
                false
            }
        };

        if timed_out {
            tracing::warn!("Crawl deadline reached, stopping workers");
            workers.abort_all();
            join_workers(&mut workers).await;
        }

        let tally = std::mem::take(
            &mut *self
                .shared
                .tally
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        let report = CrawlReport {
            seed: self.seed.clone(),
            pages: tally.pages,
            urls_crawled: self.shared.frontier.visited_len(),
            urls_queued: self.shared.frontier.pending_len(),
            ignored: tally.ignored,
            duplicate_redirects: tally.duplicate_redirects,
            empty_pages: tally.empty_pages,
            analysis_failures: tally.analysis_failures,
            failures: tally.failures,
            timed_out,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} URLs crawled, {} pages analyzed, {} still queued in {:?}",
            report.urls_crawled,
            report.pages.len(),
            report.urls_queued,
            self.shared.start.elapsed()
        );

        Ok(report)
    }
}

/// Waits for every worker, logging any that panicked
async fn join_workers(workers: &mut JoinSet<()>) {
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                tracing::error!("Worker panicked: {}", e);
            }
        }
    }
}

/// One member of the worker pool
async fn worker(shared: Arc<Shared>, id: u32) {
    tracing::trace!("Worker {} started", id);

    while let Some(lease) = shared.frontier.next().await {
        let outcome = process_url(&shared, lease.url()).await;

        shared
            .tally
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(outcome);

        let processed = shared.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if processed % 10 == 0 {
            let rate = processed as f64 / shared.start.elapsed().as_secs_f64();
            tracing::info!(
                "Progress: {} URLs processed, {} in queue, {:.2} pages/sec",
                processed,
                shared.frontier.pending_len(),
                rate
            );
        }

        // Lease released here, after the outcome is recorded
        drop(lease);
    }

    tracing::trace!("Worker {} finished", id);
}

/// Processes a single URL
async fn process_url(shared: &Shared, url: &str) -> Outcome {
    tracing::debug!("Processing {}", url);

    let result = shared.fetcher.fetch(url).await;

    if is_bad_page(&result) {
        return match result {
            Err(kind) => {
                tracing::warn!("Fetch of {} failed: {}", url, kind);
                Outcome::Failed(kind)
            }
            Ok(_) => {
                tracing::debug!("Empty page at {}", url);
                Outcome::Empty
            }
        };
    }

    let (final_url, body) = match result {
        Ok(Fetched::Page { final_url, body }) => (final_url, body),
        _ => return Outcome::Ignored,
    };

    // A redirect target is crawled at most once, however it was reached
    if final_url != url && !shared.frontier.claim(&final_url) {
        tracing::debug!("{} redirects to already crawled {}", url, final_url);
        return Outcome::Duplicate;
    }

    match analyze_page(shared, &final_url, &body) {
        Ok(page) => Outcome::Analyzed(page),
        Err(e) => {
            tracing::warn!("{}", e);
            Outcome::Unparseable
        }
    }
}

/// Builds the page record and feeds its links back to the frontier
fn analyze_page(shared: &Shared, final_url: &str, body: &str) -> Result<Page, CrawlerError> {
    let parsed = parse_html(body).map_err(|message| CrawlerError::HtmlParse {
        url: final_url.to_string(),
        message,
    })?;

    let mut queued = 0;
    for href in &parsed.hrefs {
        match normalize_link(href.as_deref(), final_url, &shared.rules) {
            Ok(link) => {
                if shared.frontier.offer(&link) {
                    queued += 1;
                }
            }
            Err(reason) => tracing::trace!("Skipping link on {}: {}", final_url, reason),
        }
    }
    tracing::debug!(
        "{}: {} links found, {} newly queued",
        final_url,
        parsed.hrefs.len(),
        queued
    );

    let key_words = rank_keywords(parsed.text_chunks.iter().map(String::as_str));

    Ok(Page::new(
        final_url.to_string(),
        parsed.meta_description,
        key_words,
    ))
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::Config;
/// use ripple_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), "http://www.example.com").await?;
/// println!("Crawled {} pages", report.urls_crawled);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, seed: &str) -> Result<CrawlReport, CrawlerError> {
    Coordinator::new(config, seed)?.run().await
}
