// Unit tests for the text analysis building blocks.
//
// Pure functions only: keyword extraction limits and ordering, category
// priority, the polarity-to-label boundaries, and reply parsing.

use std::sync::Arc;

use pulse::analysis::analyzer::Analyzer;
use pulse::analysis::category::{Category, CategoryRules};
use pulse::analysis::keywords::{KeywordCount, KeywordExtractor, DEFAULT_MAX_KEYWORDS};
use pulse::analysis::lexicon::PolarityLexicon;
use pulse::analysis::tokenize::{StopwordFilter, Tokenizer};
use pulse::sentiment::classifier::{fallback_confidence, parse_reply};
use pulse::sentiment::traits::Sentiment;

fn small_stopwords() -> Arc<StopwordFilter> {
    Arc::new(StopwordFilter::from_words(["the", "and", "was", "for"]))
}

// ============================================================
// Keyword extraction
// ============================================================

#[test]
fn keywords_never_exceed_ten() {
    let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike";
    let keywords = KeywordExtractor::new(small_stopwords()).extract(text);
    assert_eq!(keywords.len(), DEFAULT_MAX_KEYWORDS);
    // All tied at 1, so the first ten seen survive
    assert_eq!(keywords[0].keyword, "alpha");
    assert_eq!(keywords[9].keyword, "juliet");
}

#[test]
fn keywords_sorted_by_count_then_first_seen() {
    let text = "wifi library wifi exam library wifi";
    let keywords = KeywordExtractor::new(small_stopwords()).extract(text);
    assert_eq!(
        keywords,
        vec![
            KeywordCount::new("wifi", 3),
            KeywordCount::new("library", 2),
            KeywordCount::new("exam", 1),
        ]
    );
}

#[test]
fn keywords_exclude_short_tokens_and_stopwords() {
    let extractor = KeywordExtractor::new(small_stopwords());
    for kw in extractor.extract("The AI lab and the TA was great for us") {
        assert!(kw.keyword.chars().count() >= 3, "{} is too short", kw.keyword);
        assert!(!["the", "and", "was", "for"].contains(&kw.keyword.as_str()));
    }
}

#[test]
fn keywords_from_punctuation_only_is_empty() {
    let extractor = KeywordExtractor::new(small_stopwords());
    assert!(extractor.extract("!!! ... ???").is_empty());
    assert!(extractor.extract("").is_empty());
}

#[test]
fn tokenizer_strips_digits_and_punctuation() {
    let tokens = Tokenizer::default().tokenize("Projector: BROKEN!! (again, 3rd time)");
    assert_eq!(tokens, vec!["projector", "broken", "again", "rd", "time"]);
}

#[test]
fn tokenizer_splits_on_non_breaking_space() {
    let tokens = Tokenizer::default().tokenize("Library\u{a0}lighting is\u{2003}dim");
    assert_eq!(tokens, vec!["library", "lighting", "is", "dim"]);
}

#[test]
fn english_stopwords_are_loaded() {
    let stopwords = StopwordFilter::english();
    assert!(!stopwords.is_empty());
    assert!(stopwords.is_stopword("the"));
    assert!(!stopwords.is_stopword("library"));
}

#[test]
fn feedback_vocabulary_survives_english_stopwords() {
    let keywords: Vec<String> = Analyzer::offline()
        .extract_keywords("The course was great and the test was good, really helpful and useful")
        .into_iter()
        .map(|k| k.keyword)
        .collect();
    assert_eq!(
        keywords,
        vec!["course", "great", "test", "good", "really", "helpful", "useful"]
    );
}

// ============================================================
// Categorization
// ============================================================

#[test]
fn every_text_gets_exactly_one_category() {
    let rules = CategoryRules::default();
    for text in [
        "",
        "The exam in the lab with the professor during the workshop",
        "nothing relevant here",
    ] {
        assert!(Category::ALL.contains(&rules.categorize(text)));
    }
}

#[test]
fn ties_resolve_in_priority_order() {
    let rules = CategoryRules::default();
    // one hit each: course (exam), faculty (professor), facilities (lab), events (workshop)
    assert_eq!(
        rules.categorize("The exam in the lab with the professor during the workshop"),
        Category::Course
    );
    // faculty (professor) vs facilities (library)
    assert_eq!(rules.categorize("professor in the library"), Category::Faculty);
    // facilities (building) vs events (seminar)
    assert_eq!(rules.categorize("seminar building"), Category::Facilities);
}

#[test]
fn higher_score_beats_priority() {
    let rules = CategoryRules::default();
    assert_eq!(
        rules.categorize("The exam was held during a seminar at the conference event"),
        Category::Events
    );
}

// ============================================================
// Sentiment boundaries
// ============================================================

#[test]
fn polarity_label_boundaries() {
    assert_eq!(Sentiment::from_polarity(0.1), Sentiment::Neutral);
    assert_eq!(Sentiment::from_polarity(0.1001), Sentiment::Positive);
    assert_eq!(Sentiment::from_polarity(-0.1), Sentiment::Neutral);
    assert_eq!(Sentiment::from_polarity(-0.1001), Sentiment::Negative);
}

#[test]
fn fallback_confidence_always_in_range() {
    for p in [-1.0, -0.31, -0.3, 0.0, 0.3, 0.31, 1.0] {
        let c = fallback_confidence(p);
        assert!((0.0..=1.0).contains(&c), "confidence {c} for polarity {p}");
    }
}

#[test]
fn lexicon_polarity_stays_in_range() {
    let lexicon = PolarityLexicon::default();
    for text in [
        "extremely extremely excellent perfect superb",
        "absolutely horrible terrible awful worst",
        "not bad not good",
        "",
    ] {
        let p = lexicon.polarity(text);
        assert!((-1.0..=1.0).contains(&p), "polarity {p} for {text:?}");
    }
}

#[test]
fn wonderful_feedback_scores_positive_and_confident() {
    let p = PolarityLexicon::default().polarity("This course was absolutely wonderful and amazing");
    assert_eq!(Sentiment::from_polarity(p), Sentiment::Positive);
    assert!(fallback_confidence(p) > 0.3);
}

#[test]
fn reply_parsing_clamps_confidence() {
    let (s, c) = parse_reply("NEGATIVE|-0.4").unwrap();
    assert_eq!(s, Sentiment::Negative);
    assert_eq!(c, 0.0);
}
