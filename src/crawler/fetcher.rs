//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (user agent, timeouts, no automatic redirects)
//! - Refusing overlong or non-HTTP(S) URLs before anything is sent
//! - Following a single `301 Moved Permanently` hop
//! - Gating on status `200` and an HTML Content-Type
//! - Turning every failure into a classified [`FetchError`]

use crate::config::Config;
use crate::crawler::classify::{classify, MissingLocation, UnsupportedScheme};
use crate::url::canonicalize;
use crate::FetchError;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Successful outcome of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// An HTML body worth analyzing
    Page {
        /// URL the body came from (the redirect target, if one was followed)
        final_url: String,
        /// Page body content
        body: String,
    },

    /// The server answered, but not with `200` + HTML; nothing to analyze
    Ignored {
        /// Final HTTP status code
        status_code: u16,
        /// Content-Type header value, empty if absent
        content_type: String,
    },
}

/// Result of a fetch operation
pub type FetchResult = Result<Fetched, FetchError>;

/// Returns true for results that must never be analyzed
///
/// A page is bad when the fetch failed or the body holds nothing but whitespace.
/// `Fetched::Ignored` is not bad, just empty-handed.
pub fn is_bad_page(result: &FetchResult) -> bool {
    match result {
        Err(_) => true,
        Ok(Fetched::Page { body, .. }) => body.trim().is_empty(),
        Ok(Fetched::Ignored { .. }) => false,
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed by the client itself; the fetcher owns the
/// single-hop redirect policy.
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::Config;
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.value.as_str())
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests and classifies their outcome
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_url_length: usize,
    strict_content_type: bool,
}

impl Fetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            max_url_length: config.filter.max_url_length,
            strict_content_type: config.crawler.strict_content_type,
        }
    }

    /// Fetches a URL
    ///
    /// # Request Flow
    ///
    /// 1. Refuse URLs longer than the length cap (`InvalidUrl`, nothing is sent);
    ///    the same cap applies to a redirect target
    /// 2. Parse the URL; only `http` and `https` are requested
    /// 3. GET the URL
    /// 4. On `301`, resolve `Location` against the URL and GET it once; a second
    ///    redirect is not followed
    /// 5. Accept the body only for status `200` with an HTML Content-Type;
    ///    anything else is `Fetched::Ignored`
    /// 6. Decode the body as UTF-8; invalid bytes are an `EncodingFailure`
    ///
    /// # Returns
    ///
    /// * `Ok(Fetched)` - The server answered
    /// * `Err(FetchError)` - The classified failure
    pub async fn fetch(&self, url: &str) -> FetchResult {
        self.check_length(url)?;

        let target = parse_target(url)?;
        let response = self.get(target.clone()).await?;

        let (response, final_url) = if response.status() == StatusCode::MOVED_PERMANENTLY {
            tracing::debug!("HTTP response: {} for {}", response.status(), url);
            let location = redirect_target(&target, &response)?;
            let final_url = canonicalize(location.as_str());
            self.check_length(&final_url)?;
            (self.get(location).await?, final_url)
        } else {
            (response, url.to_string())
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if status != StatusCode::OK || !self.is_html(&content_type) {
            tracing::debug!(
                "Not analyzing {}: status {}, content-type '{}'",
                final_url,
                status.as_u16(),
                content_type
            );
            return Ok(Fetched::Ignored {
                status_code: status.as_u16(),
                content_type,
            });
        }

        // Decoded strictly: a body that is not valid UTF-8 is never analyzed
        let bytes = response.bytes().await.map_err(|e| classify(&e))?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| classify(&e))?;

        Ok(Fetched::Page { final_url, body })
    }

    /// Refuses URLs over the length cap before anything is sent
    fn check_length(&self, url: &str) -> Result<(), FetchError> {
        let len = url.chars().count();
        if len > self.max_url_length {
            tracing::debug!("Not requesting overlong URL ({} chars)", len);
            return Err(FetchError::InvalidUrl);
        }
        Ok(())
    }

    async fn get(&self, url: Url) -> Result<Response, FetchError> {
        self.client.get(url).send().await.map_err(|e| classify(&e))
    }

    /// Checks the Content-Type gate
    ///
    /// Strict mode wants exactly `text/html`; lenient mode also accepts
    /// parameters such as `; charset=utf-8`.
    fn is_html(&self, content_type: &str) -> bool {
        if self.strict_content_type {
            content_type == "text/html"
        } else {
            content_type
                .split(';')
                .next()
                .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
        }
    }
}

/// Parses a URL the fetcher is willing to request
fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| classify(&e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(classify(&UnsupportedScheme(other.to_string()))),
    }
}

/// Resolves the `Location` header of a redirect against the requested URL
fn redirect_target(requested: &Url, response: &Response) -> Result<Url, FetchError> {
    let location = response
        .headers()
        .get(LOCATION)
        .ok_or_else(|| classify(&MissingLocation))?
        .to_str()
        .map_err(|e| classify(&e))?;

    let resolved = requested.join(location).map_err(|e| classify(&e))?;
    match resolved.scheme() {
        "http" | "https" => Ok(resolved),
        other => Err(classify(&UnsupportedScheme(other.to_string()))),
    }
}
