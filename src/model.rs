use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single model invocation
#[derive(Debug, Error)]
pub enum ModelError {
    /// Transport or decode failure; the request URL is stripped before wrapping
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("API request failed: {status} {body}")]
    Api { status: u16, body: String },
    #[error("no response generated")]
    EmptyResponse,
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}

/// A text generation backend: one prompt in, one answer out
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
