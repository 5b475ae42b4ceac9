use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::sentiment::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Which sentiment classifier path(s) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    /// Completion service when OPENAI_API_KEY is set, lexicon otherwise (default)
    Auto,
    /// Completion service is mandatory; startup fails without a key
    OpenAi,
    /// Local lexicon only, never calls out
    Lexicon,
}

impl FromStr for ClassifierMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(ClassifierMode::Auto),
            "openai" => Ok(ClassifierMode::OpenAi),
            "lexicon" => Ok(ClassifierMode::Lexicon),
            other => anyhow::bail!(
                "PULSE_CLASSIFIER must be one of auto, openai, lexicon (got {other:?})"
            ),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Secrets only ever come from the environment. The .env file is loaded at
/// startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    /// Base URL of an OpenAI-compatible chat-completions endpoint
    pub llm_url: String,
    pub llm_model: String,
    /// Upper bound on one classification request
    pub llm_timeout: Duration,
    pub classifier_mode: ClassifierMode,
    pub db_path: String,
    /// PostgreSQL connection URL (when set and starts with postgres://, uses Postgres backend)
    pub database_url: Option<String>,
    /// How many bulk rows are analyzed at once
    pub bulk_concurrency: usize,
    /// Browser origin allowed by CORS (PULSE_CORS_ORIGIN)
    pub cors_origin: String,
    /// Listen address for `pulse serve` (PULSE_BIND)
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            llm_url: DEFAULT_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_timeout: Duration::from_secs(10),
            classifier_mode: ClassifierMode::Auto,
            db_path: "./pulse.db".to_string(),
            database_url: None,
            bulk_concurrency: 4,
            cors_origin: "http://localhost:3000".to_string(),
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Unset variables keep
    /// their defaults; malformed numbers and unknown modes are an error.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let classifier_mode = match env::var("PULSE_CLASSIFIER") {
            Ok(raw) => raw.parse()?,
            Err(_) => ClassifierMode::Auto,
        };

        let llm_timeout = match env::var("PULSE_LLM_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("PULSE_LLM_TIMEOUT_SECS must be whole seconds, got {raw:?}"))?,
            ),
            Err(_) => defaults.llm_timeout,
        };

        let bulk_concurrency = match env::var("PULSE_BULK_CONCURRENCY") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("PULSE_BULK_CONCURRENCY must be a number, got {raw:?}"))?
                .max(1),
            Err(_) => defaults.bulk_concurrency,
        };

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            llm_url: env::var("PULSE_LLM_URL").unwrap_or(defaults.llm_url),
            llm_model: env::var("PULSE_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_timeout,
            classifier_mode,
            db_path: env::var("PULSE_DB_PATH").unwrap_or(defaults.db_path),
            database_url: env::var("DATABASE_URL").ok(),
            bulk_concurrency,
            cors_origin: env::var("PULSE_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            bind: env::var("PULSE_BIND").unwrap_or(defaults.bind),
        })
    }

    /// Whether classification should try the completion service first.
    pub fn use_completion_service(&self) -> bool {
        match self.classifier_mode {
            ClassifierMode::Lexicon => false,
            ClassifierMode::OpenAi => true,
            ClassifierMode::Auto => !self.openai_api_key.is_empty(),
        }
    }

    /// Check that the completion service key is configured.
    /// Only enforced when PULSE_CLASSIFIER=openai.
    pub fn require_llm(&self) -> Result<()> {
        if self.classifier_mode == ClassifierMode::OpenAi && self.openai_api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set but PULSE_CLASSIFIER=openai.\n\
                 Add the key to your .env file, or set PULSE_CLASSIFIER=auto to fall back\n\
                 to the local lexicon when no key is present."
            );
        }
        Ok(())
    }
}
