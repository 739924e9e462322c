use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::document::DEFAULT_MAX_DOCUMENT_BYTES;
use crate::gemini::GeminiConfig;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Tuning knobs for the question-answering pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct QaSettings {
    /// Words per chunk
    pub chunk_size: usize,
    /// Maximum model calls in flight across all requests
    pub max_concurrency: usize,
    /// Per-call model timeout; a timed out call counts as no answer
    pub model_timeout: Duration,
}

impl Default for QaSettings {
    fn default() -> Self {
        QaSettings {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_concurrency: 4,
            model_timeout: Duration::from_secs(60),
        }
    }
}

/// Process configuration, built once at startup
#[derive(Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub qa: QaSettings,
    pub port: u16,
    pub fetch_timeout: Duration,
    /// Largest document download accepted, in bytes
    pub max_document_bytes: usize,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let gemini = GeminiConfig::from_env().context("Missing GEMINI_API_KEY")?;
        let defaults = QaSettings::default();

        let qa = QaSettings {
            chunk_size: env_or("QA_CHUNK_SIZE", defaults.chunk_size)?,
            max_concurrency: env_or("QA_MAX_CONCURRENCY", defaults.max_concurrency)?,
            model_timeout: Duration::from_secs(env_or(
                "QA_MODEL_TIMEOUT_SECS",
                defaults.model_timeout.as_secs(),
            )?),
        };

        Ok(Config {
            gemini,
            qa,
            port: env_or("PORT", 3000)?,
            fetch_timeout: Duration::from_secs(env_or("QA_FETCH_TIMEOUT_SECS", 60)?),
            max_document_bytes: env_or(
                "QA_MAX_DOCUMENT_BYTES",
                DEFAULT_MAX_DOCUMENT_BYTES,
            )?,
        })
    }
}

/// Read and parse `key`, falling back to `default` when unset
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
}
