// Keyword extraction — per-comment term frequencies after filtering.
//
// Counts are kept in first-seen order and then stably sorted by frequency,
// so ties at the cutoff resolve in favour of the word that appeared first.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::tokenize::{StopwordFilter, Tokenizer};

/// Default cap on keywords kept per comment.
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// One extracted keyword and how many times it occurred in the comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub frequency: u32,
}

impl KeywordCount {
    pub fn new(keyword: impl Into<String>, frequency: u32) -> Self {
        Self {
            keyword: keyword.into(),
            frequency,
        }
    }
}

pub struct KeywordExtractor {
    tokenizer: Tokenizer,
    stopwords: Arc<StopwordFilter>,
    max_keywords: usize,
}

impl KeywordExtractor {
    pub fn new(stopwords: Arc<StopwordFilter>) -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            stopwords,
            max_keywords: DEFAULT_MAX_KEYWORDS,
        }
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Tokenize and filter `text` — the token stream keywords are counted from.
    pub fn filtered_tokens(&self, text: &str) -> Vec<String> {
        self.stopwords.filter(self.tokenizer.tokenize(text))
    }

    /// The most frequent filtered tokens in `text`, highest count first.
    ///
    /// Returns an empty Vec when nothing survives filtering.
    pub fn extract(&self, text: &str) -> Vec<KeywordCount> {
        let mut counts: Vec<KeywordCount> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for token in self.filtered_tokens(text) {
            match index.get(&token) {
                Some(&i) => counts[i].frequency += 1,
                None => {
                    index.insert(token.clone(), counts.len());
                    counts.push(KeywordCount::new(token, 1));
                }
            }
        }

        // sort_by is stable: equal counts keep first-seen order
        counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        counts.truncate(self.max_keywords);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(StopwordFilter::from_words([
            "the", "was", "and", "but", "very", "needs",
        ])))
    }

    #[test]
    fn test_counts_and_orders_by_frequency() {
        let kws = extractor().extract("Exam exam EXAM! The lab was cold, the lab was dark.");
        assert_eq!(kws[0], KeywordCount::new("exam", 3));
        assert_eq!(kws[1], KeywordCount::new("lab", 2));
        assert_eq!(kws[2], KeywordCount::new("cold", 1));
        assert_eq!(kws[3], KeywordCount::new("dark", 1));
        assert_eq!(kws.len(), 4);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let kws = extractor().extract("zebra apple mango apple zebra mango");
        let words: Vec<&str> = kws.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(words, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_caps_at_ten_with_stable_cutoff() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let kws = extractor().extract(text);
        assert_eq!(kws.len(), 10);
        assert_eq!(kws[0].keyword, "alpha");
        assert_eq!(kws[9].keyword, "juliet");
    }

    #[test]
    fn test_empty_when_nothing_qualifies() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("it is an ok go").is_empty());
        assert!(extractor().extract("the was and but").is_empty());
    }

    #[test]
    fn test_custom_limit() {
        let kws = extractor()
            .with_max_keywords(2)
            .extract("library library lighting seating seating seating");
        assert_eq!(
            kws,
            vec![
                KeywordCount::new("seating", 3),
                KeywordCount::new("library", 2)
            ]
        );
    }
}
