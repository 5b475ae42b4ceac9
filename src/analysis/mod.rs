// Text analysis — tokenization, keyword extraction, categorization, and the
// local polarity lexicon, tied together by the Analyzer.

pub mod analyzer;
pub mod category;
pub mod keywords;
pub mod lexicon;
pub mod tokenize;

pub use analyzer::{AnalysisResult, Analyzer, Comment};
pub use category::Category;
pub use keywords::KeywordCount;
