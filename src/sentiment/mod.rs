// Sentiment classification — an external completion service with a local
// lexicon fallback.

pub mod classifier;
pub mod openai;
pub mod traits;
