// Sentiment classifier — a two-state machine, PRIMARY then FALLBACK.
//
// Every call starts in PRIMARY when a completion service is configured. Any
// failure there (transport error, timeout, unparseable reply) moves that one
// call to FALLBACK, which scores the text with the local lexicon. Nothing is
// remembered between calls, and nothing is ever returned as an error: the
// caller always gets a label and a confidence.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::traits::{Classification, ClassifierPath, CompletionService, Sentiment};
use crate::analysis::lexicon::PolarityLexicon;

/// System instruction sent with every primary request.
pub const INSTRUCTION: &str = "You are a sentiment analysis expert. Analyze the sentiment of \
student feedback and respond with only: POSITIVE, NEGATIVE, or NEUTRAL followed by a confidence \
score (0.0-1.0). Format: SENTIMENT|CONFIDENCE_SCORE";

/// Confidence assumed when the service omits or garbles the score field.
pub const DEFAULT_PRIMARY_CONFIDENCE: f64 = 0.8;

/// Fallback confidence when the local polarity is too weak to speak for itself.
pub const FALLBACK_CONFIDENCE_FLOOR: f64 = 0.6;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SentimentClassifier {
    primary: Option<Arc<dyn CompletionService>>,
    lexicon: Arc<PolarityLexicon>,
    timeout: Duration,
}

impl SentimentClassifier {
    pub fn new(
        primary: Arc<dyn CompletionService>,
        lexicon: Arc<PolarityLexicon>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary: Some(primary),
            lexicon,
            timeout,
        }
    }

    /// A classifier with no external service: every call goes straight to FALLBACK.
    pub fn lexicon_only(lexicon: Arc<PolarityLexicon>) -> Self {
        Self {
            primary: None,
            lexicon,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Classify `text`. Infallible by contract.
    pub async fn classify(&self, text: &str) -> Classification {
        let mut state = if self.primary.is_some() {
            ClassifierPath::Primary
        } else {
            ClassifierPath::Fallback
        };

        loop {
            match state {
                ClassifierPath::Primary => match self.classify_primary(text).await {
                    Ok(result) => return result,
                    Err(e) => {
                        warn!(error = %format!("{e:#}"), "Primary sentiment classifier failed, using lexicon fallback");
                        state = ClassifierPath::Fallback;
                    }
                },
                ClassifierPath::Fallback => return self.classify_fallback(text),
            }
        }
    }

    /// PRIMARY branch: ask the completion service and parse its reply.
    pub async fn classify_primary(&self, text: &str) -> Result<Classification> {
        let service = self
            .primary
            .as_ref()
            .context("No completion service configured")?;

        let prompt = format!("Analyze this student feedback: {text}");
        let reply = tokio::time::timeout(self.timeout, service.complete(INSTRUCTION, &prompt))
            .await
            .with_context(|| format!("Completion service timed out after {:?}", self.timeout))??;

        let (sentiment, confidence) = parse_reply(&reply)?;
        debug!(%sentiment, confidence, "Primary classification");

        Ok(Classification {
            sentiment,
            confidence,
            path: ClassifierPath::Primary,
        })
    }

    /// FALLBACK branch: deterministic lexicon scoring.
    pub fn classify_fallback(&self, text: &str) -> Classification {
        let polarity = self.lexicon.polarity(text);
        let sentiment = Sentiment::from_polarity(polarity);
        let confidence = fallback_confidence(polarity);
        debug!(%sentiment, polarity, confidence, "Fallback classification");

        Classification {
            sentiment,
            confidence,
            path: ClassifierPath::Fallback,
        }
    }
}

/// Confidence for a fallback polarity: |p| when decisive, else the floor.
pub fn fallback_confidence(polarity: f64) -> f64 {
    let magnitude = polarity.abs();
    let confidence = if magnitude > 0.3 {
        magnitude
    } else {
        FALLBACK_CONFIDENCE_FLOOR
    };
    confidence.min(1.0)
}

/// Parse a `LABEL|CONFIDENCE` reply.
///
/// The label must be one of the three sentiments (any case). A missing,
/// non-numeric, or non-finite confidence becomes 0.8; an out-of-range one is
/// clamped into [0, 1].
pub fn parse_reply(reply: &str) -> Result<(Sentiment, f64)> {
    let mut parts = reply.trim().splitn(2, '|');
    let label = parts.next().unwrap_or_default();
    let sentiment: Sentiment = label.parse()?;

    let confidence = parts
        .next()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_PRIMARY_CONFIDENCE);

    Ok((sentiment, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned(&'static str);

    #[async_trait]
    impl CompletionService for Canned {
        async fn complete(&self, _instruction: &str, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionService for Failing {
        async fn complete(&self, _instruction: &str, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused")
        }
    }

    struct Stalled;

    #[async_trait]
    impl CompletionService for Stalled {
        async fn complete(&self, _instruction: &str, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("POSITIVE|0.9".to_string())
        }
    }

    fn lexicon() -> Arc<PolarityLexicon> {
        Arc::new(PolarityLexicon::default())
    }

    #[test]
    fn test_parse_reply_variants() {
        assert_eq!(parse_reply("POSITIVE|0.92").unwrap(), (Sentiment::Positive, 0.92));
        assert_eq!(parse_reply(" negative | 0.7 ").unwrap(), (Sentiment::Negative, 0.7));
        assert_eq!(parse_reply("NEUTRAL").unwrap(), (Sentiment::Neutral, 0.8));
        assert_eq!(parse_reply("NEUTRAL|high").unwrap(), (Sentiment::Neutral, 0.8));
        assert_eq!(parse_reply("POSITIVE|1.7").unwrap(), (Sentiment::Positive, 1.0));
        assert_eq!(parse_reply("POSITIVE|NaN").unwrap(), (Sentiment::Positive, 0.8));
    }

    #[test]
    fn test_parse_reply_rejects_unknown_label() {
        assert!(parse_reply("MIXED|0.5").is_err());
        assert!(parse_reply("").is_err());
        assert!(parse_reply("The sentiment is positive").is_err());
    }

    #[test]
    fn test_fallback_confidence_rules() {
        assert!((fallback_confidence(0.8) - 0.8).abs() < 1e-9);
        assert!((fallback_confidence(-0.45) - 0.45).abs() < 1e-9);
        assert!((fallback_confidence(0.3) - 0.6).abs() < 1e-9);
        assert!((fallback_confidence(0.0) - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_primary_success() {
        let c = SentimentClassifier::new(Arc::new(Canned("NEGATIVE|0.95")), lexicon(), DEFAULT_TIMEOUT);
        let result = c.classify("The lab is great").await;
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!((result.confidence - 0.95).abs() < 1e-9);
        assert_eq!(result.path, ClassifierPath::Primary);
    }

    #[tokio::test]
    async fn test_service_error_falls_back() {
        let failing = Arc::new(Failing {
            calls: AtomicUsize::new(0),
        });
        let c = SentimentClassifier::new(failing.clone(), lexicon(), DEFAULT_TIMEOUT);
        let result = c.classify("This course was absolutely wonderful and amazing").await;
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert!(result.confidence > 0.3);
        assert_eq!(result.path, ClassifierPath::Fallback);

        // Next call starts in PRIMARY again
        c.classify("anything").await;
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_garbled_label_falls_back() {
        let c = SentimentClassifier::new(Arc::new(Canned("I think it's fine")), lexicon(), DEFAULT_TIMEOUT);
        let result = c.classify("The seminar is on Tuesday").await;
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 0.6).abs() < 1e-9);
        assert_eq!(result.path, ClassifierPath::Fallback);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let c = SentimentClassifier::new(Arc::new(Stalled), lexicon(), Duration::from_millis(50));
        let result = c.classify("terrible and boring").await;
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.path, ClassifierPath::Fallback);
    }

    #[tokio::test]
    async fn test_lexicon_only_never_calls_primary() {
        let c = SentimentClassifier::lexicon_only(lexicon());
        assert!(!c.has_primary());
        let result = c.classify("good").await;
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.path, ClassifierPath::Fallback);
        assert!(c.classify_primary("good").await.is_err());
    }
}
