//! Content analysis: keyword ranking over a page's text
//!
//! Each whitespace-delimited token goes through:
//! 1. lowercasing
//! 2. a length check (4 to 30 characters)
//! 3. stripping one punctuation character from each end
//! 4. the stop-word and positive-number filter
//! 5. the symbol filter
//!
//! Survivors are counted, ranked by count (first-seen order breaks ties) and cut
//! to the top [`MAX_KEY_WORDS`].

use crate::state::KeyWord;
use std::collections::HashMap;

/// Most keywords kept per page
pub const MAX_KEY_WORDS: usize = 20;

const MIN_WORD_LEN: usize = 4;
const MAX_WORD_LEN: usize = 30;

/// Stripped once from the start and once from the end of a token
const EDGE_PUNCTUATION: &[char] = &['.', ',', '?', '!', ':', ';', '\'', '’', '"', '”'];

/// Any of these anywhere in a stripped token rejects it
const SYMBOLS: &[char] = &[
    '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '{', '}', '|', '[', ']',
    '\\', ':', ';', '"', '<', '>', '/', '…',
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "about", "are", "com", "for", "see", "from", "how", "that", "this", "was",
    "what", "you", "which", "when", "where", "who", "will", "with", "www", "out", "use", "all",
    "have", "more", "only", "your", "part", "been", "any", "now", "those", "div", "span", "new",
    "trn", "divn", "var", "function", "like", "not", "get", "some", "posted", "can", "there",
    "very", "their", "else", "has", "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december", "than", "here", "were",
    "these", "next", "they", "would", "know", "could", "while", "also", "every", "dont", "back",
    "should", "good", "its", "since", "youre", "using", "over", "entire", "just", "each", "ever",
    "along", "going", "really", "come", "lets",
];

/// Ranks the keywords of a page's text chunks
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::rank_keywords;
///
/// let ranked = rank_keywords(["Rust crawls; rust parses.", "Crawls again"]);
/// assert_eq!(ranked[0], ("rust".to_string(), 2));
/// assert_eq!(ranked[1], ("crawls".to_string(), 2));
/// assert_eq!(ranked[2], ("parses".to_string(), 1));
/// ```
pub fn rank_keywords<'a, I>(chunks: I) -> Vec<KeyWord>
where
    I: IntoIterator<Item = &'a str>,
{
    let words = chunks
        .into_iter()
        .flat_map(str::split_whitespace)
        .filter_map(good_word);

    let mut ranked = count_words(words);
    // Stable: equal counts keep first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MAX_KEY_WORDS);
    ranked
}

/// Runs one raw token through the filter pipeline
///
/// # Returns
///
/// The cleaned, lowercased word, or `None` if it does not qualify
pub fn good_word(token: &str) -> Option<String> {
    let lower = token.to_lowercase();

    let len = lower.chars().count();
    if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
        return None;
    }

    let word = strip_edges(&lower);

    if is_stop_word(word) || is_positive_number(word) {
        return None;
    }

    if has_symbols(word) || !word.chars().any(char::is_alphanumeric) {
        return None;
    }

    Some(word.to_string())
}

/// Removes at most one punctuation character from each end
fn strip_edges(word: &str) -> &str {
    let word = word.strip_prefix(EDGE_PUNCTUATION).unwrap_or(word);
    word.strip_suffix(EDGE_PUNCTUATION).unwrap_or(word)
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// True when the word starts with a number greater than zero (`"2015"`, `"3rd"`)
fn is_positive_number(word: &str) -> bool {
    let unsigned = word.strip_prefix('+').unwrap_or(word);
    unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .any(|c| c != '0')
}

fn has_symbols(word: &str) -> bool {
    word.contains(SYMBOLS)
}

/// Counts words, keeping first-seen order
fn count_words<I>(words: I) -> Vec<KeyWord>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<KeyWord> = Vec::new();

    for word in words {
        match index.get(&word) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }

    counts
}
