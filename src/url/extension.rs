use url::Url;

/// Extracts the lowercased file extension of the last path segment
///
/// Query strings and fragments are ignored, as is a single trailing `/` left by
/// canonicalization, so `http://a.com/report.pdf/` still reports `pdf`. The host
/// never contributes an extension: `http://a.com/` has none.
///
/// Works on absolute URLs and on raw relative hrefs alike.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::file_extension;
///
/// assert_eq!(file_extension("http://a.com/img/Logo.PNG"), Some("png".to_string()));
/// assert_eq!(file_extension("docs/guide.pdf?dl=1"), Some("pdf".to_string()));
/// assert_eq!(file_extension("http://a.com/"), None);
/// ```
pub fn file_extension(link: &str) -> Option<String> {
    let without_query = link.split(['?', '#']).next().unwrap_or(link);

    let path = match Url::parse(without_query) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => without_query.to_string(),
    };

    let trimmed = path.strip_suffix('/').unwrap_or(&path);
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);

    segment
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
