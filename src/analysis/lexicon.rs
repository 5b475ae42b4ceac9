// Local polarity lexicon — the deterministic fallback sentiment scorer.
//
// Each known word carries a polarity in [-1, 1]. A document's polarity is the
// mean over the lexicon words it contains, after two adjustments:
//   - an intensifier directly before a word scales it ("very good")
//   - a negation within the two preceding tokens flips and halves it
//     ("not good" => -0.35)
// Words outside the lexicon contribute nothing, so text with no opinion words
// scores exactly 0.0.

use std::collections::{HashMap, HashSet};

/// Multiplier applied to a negated word's polarity.
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone)]
pub struct PolarityLexicon {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        let words: HashMap<&'static str, f64> = [
            // positive
            ("amazing", 0.6),
            ("awesome", 1.0),
            ("beautiful", 0.85),
            ("best", 1.0),
            ("better", 0.5),
            ("brilliant", 0.9),
            ("clear", 0.1),
            ("comfortable", 0.4),
            ("convenient", 0.4),
            ("delightful", 1.0),
            ("easy", 0.43),
            ("engaging", 0.5),
            ("enjoy", 0.4),
            ("enjoyable", 0.5),
            ("enjoyed", 0.4),
            ("excellent", 1.0),
            ("exciting", 0.3),
            ("fantastic", 0.4),
            ("fun", 0.3),
            ("glad", 0.5),
            ("good", 0.7),
            ("great", 0.8),
            ("happy", 0.8),
            ("helpful", 0.5),
            ("impressive", 1.0),
            ("informative", 0.5),
            ("interesting", 0.5),
            ("knowledgeable", 0.5),
            ("like", 0.2),
            ("love", 0.5),
            ("loved", 0.7),
            ("nice", 0.6),
            ("organized", 0.3),
            ("outstanding", 0.5),
            ("perfect", 1.0),
            ("pleasant", 0.73),
            ("recommend", 0.3),
            ("satisfied", 0.5),
            ("superb", 1.0),
            ("supportive", 0.5),
            ("thank", 0.3),
            ("thanks", 0.3),
            ("useful", 0.3),
            ("valuable", 0.5),
            ("well", 0.2),
            ("wonderful", 1.0),
            // negative
            ("annoying", -0.8),
            ("awful", -1.0),
            ("bad", -0.7),
            ("boring", -1.0),
            ("broken", -0.4),
            ("confusing", -0.3),
            ("crowded", -0.3),
            ("difficult", -0.5),
            ("dirty", -0.6),
            ("disappointed", -0.75),
            ("disappointing", -0.6),
            ("disorganized", -0.5),
            ("frustrating", -0.4),
            ("hard", -0.3),
            ("hate", -0.8),
            ("horrible", -1.0),
            ("inadequate", -0.5),
            ("late", -0.3),
            ("noisy", -0.4),
            ("outdated", -0.4),
            ("poor", -0.4),
            ("rude", -0.3),
            ("slow", -0.3),
            ("terrible", -1.0),
            ("uncomfortable", -0.5),
            ("unclear", -0.4),
            ("unfair", -0.5),
            ("unhelpful", -0.5),
            ("useless", -0.5),
            ("waste", -0.2),
            ("worse", -0.4),
            ("worst", -1.0),
        ]
        .into_iter()
        .collect();

        let intensifiers: HashMap<&'static str, f64> = [
            ("absolutely", 1.3),
            ("extremely", 1.5),
            ("highly", 1.3),
            ("incredibly", 1.5),
            ("really", 1.2),
            ("so", 1.2),
            ("super", 1.3),
            ("totally", 1.3),
            ("truly", 1.2),
            ("very", 1.3),
        ]
        .into_iter()
        .collect();

        let negations: HashSet<&'static str> = [
            "not", "no", "never", "neither", "nor", "nothing", "hardly", "dont", "didnt",
            "doesnt", "isnt", "wasnt", "arent", "werent", "cant", "couldnt", "wont",
        ]
        .into_iter()
        .collect();

        Self {
            words,
            intensifiers,
            negations,
        }
    }
}

impl PolarityLexicon {
    /// Polarity of `text` in [-1, 1]; 0.0 when no lexicon word is present.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = split_words(text);
        let mut values = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token.as_str()) else {
                continue;
            };

            let mut value = base;
            let mut lookback = i;
            if i > 0 {
                if let Some(&factor) = self.intensifiers.get(tokens[i - 1].as_str()) {
                    value *= factor;
                    lookback = i - 1;
                }
            }

            let start = lookback.saturating_sub(2);
            if tokens[start..lookback]
                .iter()
                .any(|t| self.negations.contains(t.as_str()))
            {
                value *= NEGATION_FACTOR;
            }

            values.push(value.clamp(-1.0, 1.0));
        }

        if values.is_empty() {
            return 0.0;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Lowercased word split that folds contractions ("don't" -> "dont") so
/// negations survive. Digits and other symbols act as separators.
fn split_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\'', '\u{2019}'], "")
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
