use crate::answer::{ask, ChunkAnswer};
use crate::chunking::TextChunk;
use crate::model::LanguageModel;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Ask `question` against every chunk and collect one answer per chunk.
///
/// Calls run concurrently, at most as many at a time as `limiter` has
/// permits. The result is indexed by chunk position regardless of the order
/// in which calls complete. Dropping the returned future aborts every call
/// still in flight.
pub async fn answer_across_chunks(
    model: Arc<dyn LanguageModel>,
    limiter: Arc<Semaphore>,
    chunks: Arc<Vec<TextChunk>>,
    question: &str,
    timeout: Duration,
) -> Vec<ChunkAnswer> {
    let mut answers: Vec<ChunkAnswer> = chunks
        .iter()
        .map(|chunk| ChunkAnswer::Absent {
            chunk_index: chunk.index,
        })
        .collect();

    let question: Arc<str> = Arc::from(question);
    let mut set = JoinSet::new();

    for position in 0..chunks.len() {
        let permit = match limiter.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Model call limiter closed; skipping remaining chunks");
                break;
            }
        };
        let model = model.clone();
        let chunks = chunks.clone();
        let question = question.clone();
        set.spawn(async move {
            let _permit = permit;
            let answer = ask(model.as_ref(), &chunks[position], &question, timeout).await;
            (position, answer)
        });
    }

    while let Some(result) = set.join_next().await {
        match result {
            Ok((position, answer)) => answers[position] = answer,
            Err(e) => warn!("Chunk task failed: {}", e),
        }
    }

    debug!(
        "{} of {} chunks answered",
        answers.iter().filter(|a| a.text().is_some()).count(),
        answers.len()
    );
    answers
}
