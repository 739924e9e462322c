use crate::error::QaError;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;

/// Number of leading bytes searched for the PDF header
const PDF_HEADER_WINDOW: usize = 1024;

/// Default download limit (50 MiB)
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 50 * 1024 * 1024;

/// Source of plain document text for a URL
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Retrieve the document at `url` and return its full plain text
    async fn load_text(&self, url: &str) -> Result<String, QaError>;
}

/// Downloads PDF documents over HTTP and extracts their text
#[derive(Clone)]
pub struct RemotePdfLoader {
    client: reqwest::Client,
    max_bytes: usize,
}

impl RemotePdfLoader {
    /// Create a loader whose downloads give up after `timeout` or past `max_bytes`
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, QaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                QaError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(RemotePdfLoader { client, max_bytes })
    }

    /// Download the raw bytes behind `url`, refusing bodies larger than the limit
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, QaError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QaError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QaError::fetch(url, format!("HTTP status {}", status)));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(self.too_large(url));
            }
        }

        // Content-Length may be absent or wrong
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| QaError::fetch(url, e))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(url));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }

    fn too_large(&self, url: &str) -> QaError {
        QaError::fetch(
            url,
            format!("document exceeds the {} byte limit", self.max_bytes),
        )
    }
}

#[async_trait]
impl DocumentLoader for RemotePdfLoader {
    async fn load_text(&self, url: &str) -> Result<String, QaError> {
        info!("Downloading document: {}", url);
        let bytes = self.fetch_bytes(url).await?;

        // Text extraction is CPU bound and may panic on malformed input
        let content = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| QaError::Extraction(format!("extraction task failed: {}", e)))??;

        if content.trim().is_empty() {
            warn!("Extracted PDF content is empty or contains only whitespace");
        }
        Ok(content)
    }
}

/// Extract the plain text of an in-memory PDF document
pub fn extract_text(bytes: &[u8]) -> Result<String, QaError> {
    if !has_pdf_header(bytes) {
        return Err(QaError::Extraction(
            "content is not a PDF document".to_string(),
        ));
    }

    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| QaError::Extraction(e.to_string()))
}

/// Whether the `%PDF-` marker appears near the start of the buffer
fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}
