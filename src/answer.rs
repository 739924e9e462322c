use crate::chunking::TextChunk;
use crate::model::{LanguageModel, ModelError};
use log::{debug, warn};
use std::time::Duration;

/// Outcome of asking the model one question about one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkAnswer {
    /// The model produced a non-empty answer
    Answered { chunk_index: usize, text: String },
    /// No usable answer: the call failed, timed out or returned an empty string
    Absent { chunk_index: usize },
}

impl ChunkAnswer {
    pub fn chunk_index(&self) -> usize {
        match self {
            ChunkAnswer::Answered { chunk_index, .. } | ChunkAnswer::Absent { chunk_index } => {
                *chunk_index
            }
        }
    }

    /// Answer text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            ChunkAnswer::Answered { text, .. } => Some(text.as_str()),
            ChunkAnswer::Absent { .. } => None,
        }
    }

    /// Length score in characters; absent answers have no score
    pub fn score(&self) -> Option<usize> {
        self.text().map(|t| t.chars().count())
    }
}

/// Build the prompt for one chunk and one question
pub fn build_prompt(chunk: &str, question: &str) -> String {
    format!(
        "Use the following document content to answer the question clearly and factually. \
Answer only from the given text.\n\n\
Document Text:\n\"\"\"{}\"\"\"\n\n\
Question: {}\n\n\
Answer:",
        chunk, question
    )
}

/// Ask the model `question` against `chunk`, folding any failure into an absent answer
pub async fn ask(
    model: &dyn LanguageModel,
    chunk: &TextChunk,
    question: &str,
    timeout: Duration,
) -> ChunkAnswer {
    let prompt = build_prompt(&chunk.text, question);

    let result = match tokio::time::timeout(timeout, model.generate(&prompt)).await {
        Ok(result) => result,
        Err(_) => Err(ModelError::Timeout(timeout)),
    };

    match result {
        Ok(text) if !text.is_empty() => {
            debug!(
                "Chunk {} answered with {} characters",
                chunk.index,
                text.chars().count()
            );
            ChunkAnswer::Answered {
                chunk_index: chunk.index,
                text,
            }
        }
        Ok(_) => {
            debug!("Chunk {} produced an empty answer", chunk.index);
            ChunkAnswer::Absent {
                chunk_index: chunk.index,
            }
        }
        Err(e) => {
            warn!("Model error on chunk {}: {}", chunk.index, e);
            ChunkAnswer::Absent {
                chunk_index: chunk.index,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Model double that replies according to a closure
    pub(crate) struct FnModel<F>(F);

    impl<F> FnModel<F>
    where
        F: Fn(&str) -> Result<String, ModelError> + Send + Sync,
    {
        pub(crate) fn new(f: F) -> Self {
            FnModel(f)
        }
    }

    #[async_trait]
    impl<F> LanguageModel for FnModel<F>
    where
        F: Fn(&str) -> Result<String, ModelError> + Send + Sync,
    {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            (self.0)(prompt)
        }
    }

    struct SlowModel;

    #[async_trait]
    impl LanguageModel for SlowModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    fn chunk(index: usize, text: &str) -> TextChunk {
        TextChunk {
            index,
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_prompt_embeds_chunk_and_question() {
        let prompt = build_prompt(
            "Coverage starts on day one.",
            "When does coverage start?",
        );
        assert!(prompt.contains("\"\"\"Coverage starts on day one.\"\"\""));
        assert!(prompt.contains("Question: When does coverage start?"));
        assert!(prompt.ends_with("Answer:"));
        assert_eq!(
            prompt,
            build_prompt("Coverage starts on day one.", "When does coverage start?")
        );
    }

    #[tokio::test]
    async fn test_ask_returns_answer_with_length_score() {
        let model = FnModel::new(|_| Ok("Thirty days.".to_string()));
        let answer = ask(&model, &chunk(3, "grace period text"), "Grace?", TIMEOUT).await;
        assert_eq!(
            answer,
            ChunkAnswer::Answered {
                chunk_index: 3,
                text: "Thirty days.".to_string()
            }
        );
        assert_eq!(answer.score(), Some(12));
    }

    #[tokio::test]
    async fn test_ask_model_failure_is_absent() {
        let model = FnModel::new(|_| {
            Err(ModelError::Api {
                status: 429,
                body: "rate limited".to_string(),
            })
        });
        let answer = ask(&model, &chunk(1, "text"), "q", TIMEOUT).await;
        assert_eq!(answer, ChunkAnswer::Absent { chunk_index: 1 });
        assert_eq!(answer.score(), None);
    }

    #[tokio::test]
    async fn test_ask_empty_output_is_absent() {
        let model = FnModel::new(|_| Ok(String::new()));
        let answer = ask(&model, &chunk(0, "text"), "q", TIMEOUT).await;
        assert_eq!(answer, ChunkAnswer::Absent { chunk_index: 0 });
    }

    #[tokio::test]
    async fn test_ask_whitespace_output_still_counts() {
        let model = FnModel::new(|_| Ok("  \n ".to_string()));
        let answer = ask(&model, &chunk(0, "text"), "q", TIMEOUT).await;
        assert_eq!(answer.score(), Some(4));
    }

    #[tokio::test]
    async fn test_ask_timeout_is_absent() {
        let timeout = Duration::from_millis(50);
        let answer = ask(&SlowModel, &chunk(2, "text"), "q", timeout).await;
        assert_eq!(answer, ChunkAnswer::Absent { chunk_index: 2 });
    }

    #[test]
    fn test_score_counts_characters_not_bytes() {
        let answer = ChunkAnswer::Answered {
            chunk_index: 0,
            text: "prämie".to_string(),
        };
        assert_eq!(answer.score(), Some(6));
    }
}
