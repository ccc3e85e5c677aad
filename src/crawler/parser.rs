//! HTML parser for extracting links, text and metadata
//!
//! This module wraps `scraper` and exposes exactly what the crawl engine needs
//! from a document:
//! - every anchor's raw `href` (absent hrefs included, as `None`)
//! - every text node, in document order
//! - the `content` of `<meta name="description">`

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Raw anchor hrefs, first occurrence order, duplicates removed
    pub hrefs: Vec<Option<String>>,

    /// Text node contents in document order
    pub text_chunks: Vec<String>,

    /// `<meta name="description">` content, empty if absent
    pub meta_description: String,
}

/// Parses HTML content and extracts hrefs, text and the meta description
///
/// Hrefs are returned untouched; resolving them is the job of
/// [`normalize_link`](crate::url::normalize_link).
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(String)` - Failed to build a selector for the document
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::parse_html;
///
/// let html = r#"<html><head><meta name="description" content="Hi"></head>
///               <body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html).unwrap();
/// assert_eq!(parsed.hrefs, vec![Some("/page".to_string())]);
/// assert_eq!(parsed.meta_description, "Hi");
/// ```
pub fn parse_html(html: &str) -> Result<ParsedPage, String> {
    let document = Html::parse_document(html);

    let hrefs = extract_hrefs(&document)?;
    let meta_description = extract_meta_description(&document)?;
    let text_chunks = document
        .root_element()
        .text()
        .map(str::to_string)
        .collect();

    Ok(ParsedPage {
        hrefs,
        text_chunks,
        meta_description,
    })
}

/// Collects the href of every `<a>`, keeping one copy of each value
fn extract_hrefs(document: &Html) -> Result<Vec<Option<String>>, String> {
    let selector = Selector::parse("a").map_err(|e| e.to_string())?;
    let mut seen = HashSet::new();

    Ok(document
        .select(&selector)
        .map(|element| element.value().attr("href").map(str::to_string))
        .filter(|href| seen.insert(href.clone()))
        .collect())
}

/// Reads the first `<meta name="description">` content attribute
fn extract_meta_description(document: &Html) -> Result<String, String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).map_err(|e| e.to_string())?;

    Ok(document
        .select(&selector)
        .find_map(|element| element.value().attr("content"))
        .unwrap_or_default()
        .to_string())
}
