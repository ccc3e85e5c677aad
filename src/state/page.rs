/// A ranked keyword: the lowercased word and how often it appeared
pub type KeyWord = (String, usize);

/// Result of successfully analyzing one fetched document
///
/// Fields are private; a `Page` never changes after it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: String,
    meta_description: String,
    key_words: Vec<KeyWord>,
}

impl Page {
    /// Builds a page record
    ///
    /// `key_words` must already be ranked by descending count.
    pub fn new(url: String, meta_description: String, key_words: Vec<KeyWord>) -> Self {
        debug_assert!(key_words.windows(2).all(|w| w[0].1 >= w[1].1));
        Self {
            url,
            meta_description,
            key_words,
        }
    }

    /// The URL actually fetched, after any redirect
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Content of `<meta name="description">`, empty if absent
    pub fn meta_description(&self) -> &str {
        &self.meta_description
    }

    /// Top keywords, most frequent first
    pub fn key_words(&self) -> &[KeyWord] {
        &self.key_words
    }
}
