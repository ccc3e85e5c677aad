//! Output module for crawl reports
//!
//! Results live in memory only; this module shapes them for the console.

pub mod stats;

pub use stats::{print_report, CrawlReport};
