// Analyzer — runs one comment through the whole text pipeline.
//
//   text -> Tokenizer -> StopwordFilter -> KeywordExtractor
//   text -> SentimentClassifier
//   text -> CategoryRules (unless a usable category hint was supplied)
//
// The stopword set and category rules are built once and shared read-only.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::category::{Category, CategoryRules};
use super::keywords::{KeywordCount, KeywordExtractor};
use super::lexicon::PolarityLexicon;
use super::tokenize::StopwordFilter;
use crate::error::InputError;
use crate::sentiment::classifier::SentimentClassifier;
use crate::sentiment::traits::{ClassifierPath, Sentiment};

/// One piece of submitted feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub category_hint: Option<String>,
}

impl Comment {
    /// Build a comment, rejecting empty or whitespace-only text.
    pub fn new(text: impl Into<String>, category_hint: Option<String>) -> Result<Self, InputError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(InputError::EmptyText);
        }
        let category_hint = category_hint
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        Ok(Self {
            text,
            category_hint,
        })
    }
}

/// Everything the pipeline learned about one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub category: Category,
    pub keywords: Vec<KeywordCount>,
    pub classifier: ClassifierPath,
}

pub struct Analyzer {
    keywords: KeywordExtractor,
    rules: Arc<CategoryRules>,
    classifier: SentimentClassifier,
}

impl Analyzer {
    pub fn new(
        stopwords: Arc<StopwordFilter>,
        rules: Arc<CategoryRules>,
        classifier: SentimentClassifier,
    ) -> Self {
        Self {
            keywords: KeywordExtractor::new(stopwords),
            rules,
            classifier,
        }
    }

    /// English stopwords, default category rules, and no external classifier.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(StopwordFilter::english()),
            Arc::new(CategoryRules::default()),
            SentimentClassifier::lexicon_only(Arc::new(PolarityLexicon::default())),
        )
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    pub fn extract_keywords(&self, text: &str) -> Vec<KeywordCount> {
        self.keywords.extract(text)
    }

    pub fn categorize(&self, text: &str) -> Category {
        self.rules.categorize(text)
    }

    /// Use the hint when it names a specific category; otherwise categorize.
    /// A hint of "general" asks for categorization, as does an unknown label.
    pub fn resolve_category(&self, comment: &Comment) -> Category {
        match comment.category_hint.as_deref().map(str::parse::<Category>) {
            Some(Ok(cat)) if cat != Category::General => cat,
            Some(Err(_)) => {
                debug!(hint = ?comment.category_hint, "Ignoring unknown category hint");
                self.categorize(&comment.text)
            }
            _ => self.categorize(&comment.text),
        }
    }

    pub async fn analyze(&self, comment: &Comment) -> AnalysisResult {
        let classification = self.classifier.classify(&comment.text).await;
        let category = self.resolve_category(comment);
        let keywords = self.extract_keywords(&comment.text);

        debug!(
            sentiment = %classification.sentiment,
            confidence = classification.confidence,
            category = %category,
            keywords = keywords.len(),
            text_preview = %crate::output::truncate_chars(&comment.text, 50),
            "Analyzed comment"
        );

        AnalysisResult {
            sentiment: classification.sentiment,
            confidence: classification.confidence,
            category,
            keywords,
            classifier: classification.path,
        }
    }
}
