use thiserror::Error;

/// Errors that abort a question-answering request
#[derive(Debug, Error)]
pub enum QaError {
    /// Malformed request input
    #[error("invalid request: {0}")]
    Validation(String),

    /// The document could not be downloaded
    #[error("failed to fetch document from {url}: {reason}")]
    DocumentFetch { url: String, reason: String },

    /// The downloaded bytes could not be turned into text
    #[error("failed to extract text from document: {0}")]
    Extraction(String),

    /// Invalid or missing settings
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl QaError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        QaError::DocumentFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
