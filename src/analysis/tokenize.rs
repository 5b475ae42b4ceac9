// Tokenizer and stopword filter — the first two stages of keyword extraction.
//
// Normalization deletes every character that isn't an ASCII letter or
// whitespace. Deleting (rather than replacing with a space) means "wi-fi"
// becomes "wifi" and "room101a" becomes "rooma".

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Tokens this short or shorter are never keywords.
pub const MIN_TOKEN_LEN: usize = 3;

/// Lowercases text, strips non-letters, and splits on whitespace.
///
/// Any Unicode whitespace separates tokens, so a non-breaking space between
/// two words keeps them apart.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Produce the ordered token sequence for `text`. Never fails; empty or
    /// punctuation-only input yields an empty Vec.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
            .collect();
        cleaned.split_whitespace().map(str::to_string).collect()
    }
}

/// A fixed, read-only English stopword set.
///
/// Built once at startup and shared behind an Arc — see `Analyzer::new`.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    words: HashSet<String>,
}

impl StopwordFilter {
    /// The NLTK English list (179 words) shipped with the stop-words crate.
    pub fn english() -> Self {
        Self::from_words(get(LANGUAGE::English))
    }

    /// Build a filter from an explicit word list (lowercased on the way in).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// True when `token` survives filtering: long enough and not a stopword.
    pub fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= MIN_TOKEN_LEN && !self.is_stopword(token)
    }

    /// Drop stopwords and short tokens, preserving order.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| self.keeps(t)).collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
