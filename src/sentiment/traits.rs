// Sentiment types and the completion-service seam.
//
// The CompletionService trait is the only thing the classifier knows about
// the external model. OpenAiCompletion implements it over HTTP; tests swap in
// canned or failing implementations.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Map a polarity in [-1, 1] to a label using the ±0.1 dead zone.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.1 {
            Sentiment::Positive
        } else if polarity < -0.1 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => anyhow::bail!("Unrecognized sentiment label: {other:?}"),
        }
    }
}

/// Which branch of the classifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierPath {
    Primary,
    Fallback,
}

/// A sentiment label with its confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub path: ClassifierPath,
}

/// A text-completion service: given an instruction and a prompt, return the
/// model's raw reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, instruction: &str, prompt: &str) -> Result<String>;
}
