use serde::Deserialize;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_3) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Main configuration structure for Ripple-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of parallel workers pulling from the frontier
    pub workers: u32,

    /// Whole-request timeout per fetch (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Connection timeout per fetch (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,

    /// Stop dispatching after this many URLs
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Abort the crawl after this many seconds
    #[serde(rename = "crawl-deadline")]
    pub crawl_deadline: Option<u64>,

    /// Require the Content-Type to be exactly `text/html`
    #[serde(rename = "strict-content-type")]
    pub strict_content_type: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            request_timeout: 30,
            connect_timeout: 10,
            max_pages: None,
            crawl_deadline: None,
            strict_content_type: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Link filtering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Longest URL (in characters) that is queued or fetched
    #[serde(rename = "max-url-length")]
    pub max_url_length: usize,

    /// Lowercase file extensions that never lead to a document
    #[serde(rename = "denied-extensions")]
    pub denied_extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_url_length: 200,
            denied_extensions: [
                "jpg", "jpeg", "pdf", "gif", "js", "png", "docx", "zip", "doc", "xls", "xlsx",
                "txt", "bmp",
            ]
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
        }
    }
}
