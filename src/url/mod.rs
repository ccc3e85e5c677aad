//! URL handling module for Ripple-Crawl
//!
//! This module turns raw `href` values into canonical absolute URLs and owns the
//! read-only filtering rules (length cap, non-document extensions) shared by the
//! link normalizer, the frontier and the fetcher.

mod extension;
mod normalize;

use crate::config::FilterConfig;
use std::collections::HashSet;

// Re-export main functions
pub use extension::file_extension;
pub use normalize::{canonicalize, normalize_link};

/// Read-only link filtering rules
///
/// Built once from the configuration and shared by every worker; nothing in
/// here is mutated after construction.
#[derive(Debug, Clone)]
pub struct LinkRules {
    max_url_length: usize,
    denied_extensions: HashSet<String>,
}

impl LinkRules {
    /// Builds the rules from the `[filter]` configuration section
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            max_url_length: config.max_url_length,
            denied_extensions: config
                .denied_extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Longest URL, in characters, that may be queued or fetched
    pub fn max_url_length(&self) -> usize {
        self.max_url_length
    }

    /// Returns true if `url` is longer than the configured cap
    pub fn exceeds_length(&self, url: &str) -> bool {
        url.chars().count() > self.max_url_length
    }

    /// Returns the extension of `url` if it is on the denylist
    pub fn denied_extension(&self, url: &str) -> Option<String> {
        file_extension(url).filter(|ext| self.denied_extensions.contains(ext))
    }

    /// Returns true if `url` is short enough and not a non-document file
    pub fn admits(&self, url: &str) -> bool {
        !self.exceeds_length(url) && self.denied_extension(url).is_none()
    }
}

impl Default for LinkRules {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
