use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::dto::quiz_dto::CreateQuizPayload;
use crate::error::{Error, Result};
use crate::models::quiz::{Quiz, QuizSummary};
use crate::storage::{is_valid_quiz_id, QuizStore};
use crate::utils::time;

#[derive(Clone)]
pub struct QuizService {
    store: Arc<dyn QuizStore>,
    last_id: Arc<AtomicI64>,
}

impl QuizService {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self {
            store,
            last_id: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Decodes a YAML (or JSON) quiz document, assigns ids and persists it.
    pub async fn create(&self, raw: &[u8]) -> Result<Quiz> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::BadRequest("empty document".to_string()));
        }
        let payload =
            CreateQuizPayload::from_yaml(raw).map_err(|e| Error::BadRequest(e.to_string()))?;
        let quiz = payload.into_quiz(self.next_id()?);
        self.store.put(&quiz).await?;
        tracing::info!(
            id = %quiz.id,
            questions = quiz.questions.len(),
            backend = self.backend(),
            "quiz created"
        );
        Ok(quiz)
    }

    pub async fn get(&self, id: &str) -> Result<Quiz> {
        tracing::debug!(id, "fetching quiz");
        if !is_valid_quiz_id(id) {
            return Err(Error::NotFound(format!("no quiz with id {}", id)));
        }
        self.store.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<QuizSummary>> {
        let summaries = self.store.list().await?;
        tracing::debug!(count = summaries.len(), "listed quizzes");
        Ok(summaries)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !is_valid_quiz_id(id) {
            return Err(Error::NotFound(format!("no quiz with id {}", id)));
        }
        self.store.delete(id).await?;
        tracing::info!(id, backend = self.backend(), "quiz deleted");
        Ok(())
    }

    /// Current time in nanoseconds, bumped past the previous id when the clock has not advanced.
    fn next_id(&self) -> Result<String> {
        let now = time::unix_nanos(time::now())
            .ok_or_else(|| Error::Internal("system time out of range".to_string()))?;
        let previous = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        Ok(now.max(previous + 1).to_string())
    }
}
