use crate::aggregate::pick_best;
use crate::chunking::split_into_chunks;
use crate::config::QaSettings;
use crate::document::DocumentLoader;
use crate::error::QaError;
use crate::fanout::answer_across_chunks;
use crate::model::LanguageModel;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Question-answering engine over a single remote document
pub struct QaEngine {
    loader: Arc<dyn DocumentLoader>,
    model: Arc<dyn LanguageModel>,
    limiter: Arc<Semaphore>,
    settings: QaSettings,
}

impl QaEngine {
    /// Create a new engine; the model call limit is shared by every request it serves
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        model: Arc<dyn LanguageModel>,
        settings: QaSettings,
    ) -> Result<Self, QaError> {
        if settings.chunk_size == 0 {
            return Err(QaError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if settings.max_concurrency == 0 {
            return Err(QaError::Configuration(
                "model concurrency must be greater than zero".to_string(),
            ));
        }
        if settings.model_timeout.is_zero() {
            return Err(QaError::Configuration(
                "model timeout must be greater than zero".to_string(),
            ));
        }

        let limiter = Arc::new(Semaphore::new(settings.max_concurrency));
        Ok(QaEngine {
            loader,
            model,
            limiter,
            settings,
        })
    }

    pub fn settings(&self) -> &QaSettings {
        &self.settings
    }

    /// Answer every question against the document at `document_url`.
    ///
    /// Answers come back in question order, one per question. A question no
    /// chunk could answer gets an empty string. Retrieval and extraction
    /// failures abort the whole run.
    pub async fn run(
        &self,
        document_url: &str,
        questions: &[String],
    ) -> Result<Vec<String>, QaError> {
        let text = self.loader.load_text(document_url).await?;

        let chunks = Arc::new(split_into_chunks(&text, self.settings.chunk_size)?);
        info!(
            "Split document into {} chunks of up to {} words",
            chunks.len(),
            self.settings.chunk_size
        );
        if chunks.is_empty() {
            warn!("Document has no text; every answer will be empty");
        }

        let mut answers = Vec::with_capacity(questions.len());
        for (i, question) in questions.iter().enumerate() {
            let chunk_answers = answer_across_chunks(
                self.model.clone(),
                self.limiter.clone(),
                chunks.clone(),
                question,
                self.settings.model_timeout,
            )
            .await;

            let best = pick_best(&chunk_answers);
            info!(
                "Question {}/{} answered ({} characters)",
                i + 1,
                questions.len(),
                best.chars().count()
            );
            answers.push(best);
        }

        Ok(answers)
    }
}
