use crate::error::QaError;

/// Default number of words per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Represents a text chunk with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of this chunk in the document, starting at 0
    pub index: usize,
    /// Words of this chunk joined by single spaces
    pub text: String,
    /// Number of words in this chunk
    pub word_count: usize,
}

/// Split text into consecutive windows of `chunk_size` words.
///
/// Words are separated by any run of whitespace. Every chunk except the last
/// holds exactly `chunk_size` words; chunk boundaries may fall mid-sentence.
/// Empty or whitespace-only text yields no chunks at all.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Result<Vec<TextChunk>, QaError> {
    if chunk_size == 0 {
        return Err(QaError::Configuration(
            "chunk size must be greater than zero".to_string(),
        ));
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    let chunks = words
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, window)| TextChunk {
            index,
            text: window.join(" "),
            word_count: window.len(),
        })
        .collect();

    Ok(chunks)
}
