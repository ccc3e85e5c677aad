//! Ripple-Crawl: a single-host web crawler
//!
//! This crate crawls outward from one seed URL, following hyperlinks through a
//! shared frontier worked by a pool of async workers, and derives lightweight
//! textual signals (top keywords, meta description) from every page it fetches.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Reasons a discovered link is refused entry to the frontier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Link has no href")]
    Missing,

    #[error("Protocol-relative link: {0}")]
    ProtocolRelative(String),

    #[error("Link is {len} characters long, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("Query-only link: {0}")]
    QueryOnly(String),

    #[error("Link carries a fragment: {0}")]
    Fragment(String),

    #[error("Link points at a non-document file (.{0})")]
    DeniedExtension(String),

    #[error("Unsupported link scheme: {0}")]
    UnsupportedScheme(String),
}

/// Classified failure of a single fetch
///
/// Every failure raised while parsing a URL, connecting, or decoding a response
/// collapses into one of these five kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FetchError {
    #[error("invalid URL")]
    InvalidUrl,

    #[error("not a valid URL for this client")]
    BadType,

    #[error("unable to connect to URL")]
    ConnectionFailure,

    #[error("could not decode response as UTF-8")]
    EncodingFailure,

    #[error("undefined fetch failure")]
    Generic,
}

impl FetchError {
    /// All classified failure kinds, in report order
    pub const ALL: [FetchError; 5] = [
        FetchError::InvalidUrl,
        FetchError::BadType,
        FetchError::ConnectionFailure,
        FetchError::EncodingFailure,
        FetchError::Generic,
    ];

    /// Short machine-friendly label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid-url",
            Self::BadType => "bad-type",
            Self::ConnectionFailure => "connection-failure",
            Self::EncodingFailure => "encoding-failure",
            Self::Generic => "generic",
        }
    }
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::CrawlReport;
pub use state::{Frontier, Page};
pub use url::{canonicalize, normalize_link, LinkRules};
