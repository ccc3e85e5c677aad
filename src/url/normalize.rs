use crate::url::LinkRules;
use crate::{UrlError, UrlResult};

/// Normalizes a raw `href` found on the page at `base_url`
///
/// # Rejection Rules
///
/// Applied in order; the first match refuses the link:
///
/// 1. No href at all
/// 2. Protocol-relative (`//host/...`)
/// 3. Longer than the configured URL length cap
/// 4. Query-only (`?page=2`)
/// 5. Contains a `#` fragment
/// 6. Ends in a non-document extension (images, archives, scripts, office files)
/// 7. Uses a scheme other than HTTP(S) (`mailto:`, `javascript:`, ...)
///
/// # Resolution
///
/// - `/path` is joined to the scheme and host of `base_url`
/// - `http:`/`https:` links are kept as they are
/// - anything else is appended directly after `base_url`
///
/// The result is passed through [`canonicalize`].
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::{normalize_link, LinkRules};
///
/// let rules = LinkRules::default();
/// let url = normalize_link(Some("/index.html"), "http://a.com/dir/", &rules).unwrap();
/// assert_eq!(url, "http://a.com/index.html/");
/// ```
pub fn normalize_link(href: Option<&str>, base_url: &str, rules: &LinkRules) -> UrlResult<String> {
    let href = href.ok_or(UrlError::Missing)?.trim();

    if href.starts_with("//") {
        return Err(UrlError::ProtocolRelative(href.to_string()));
    }

    if rules.exceeds_length(href) {
        return Err(UrlError::TooLong {
            len: href.chars().count(),
            max: rules.max_url_length(),
        });
    }

    if href.starts_with('?') {
        return Err(UrlError::QueryOnly(href.to_string()));
    }

    if href.contains('#') {
        return Err(UrlError::Fragment(href.to_string()));
    }

    if let Some(ext) = rules.denied_extension(href) {
        return Err(UrlError::DeniedExtension(ext));
    }

    if let Some(scheme) = foreign_scheme(href) {
        return Err(UrlError::UnsupportedScheme(scheme.to_string()));
    }

    let absolute = if href.starts_with('/') {
        format!("{}{}", root_url(base_url), href)
    } else if is_absolute(href) {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    };

    Ok(canonicalize(&absolute))
}

/// Appends a trailing `/` to shallow URLs
///
/// A URL with fewer than four dot-separated labels that does not already end in
/// `/` gets one, so `http://x.com` and `http://x.com/` share one frontier key.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::canonicalize;
///
/// assert_eq!(canonicalize("http://a.com"), "http://a.com/");
/// assert_eq!(canonicalize("http://www.a.co.uk/page.html"), "http://www.a.co.uk/page.html");
/// ```
pub fn canonicalize(link: &str) -> String {
    if link.split('.').count() < 4 && !link.ends_with('/') {
        format!("{}/", link)
    } else {
        link.to_string()
    }
}

/// Scheme and host of `base_url`: the first three `/`-separated tokens
fn root_url(base_url: &str) -> String {
    base_url.split('/').take(3).collect::<Vec<_>>().join("/")
}

/// Returns true for links that already carry an HTTP(S) scheme
fn is_absolute(href: &str) -> bool {
    let lower = href.get(..6).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http:") || lower.starts_with("https:")
}

/// Returns the scheme of a link that names one other than HTTP(S)
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`, and
/// ends at the first `:` that comes before any `/`, `?` or `#`.
fn foreign_scheme(href: &str) -> Option<&str> {
    let end = href.find([':', '/', '?', '#'])?;
    if !href[end..].starts_with(':') {
        return None;
    }

    let scheme = &href[..end];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if !valid || scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    Some(scheme)
}
