use std::sync::Arc;

use crate::db;
use crate::models::{Flashcard, QuizQuestion};
use crate::pipeline::PipelineError;

/// Read access to the study aids generated for a lecture. Listing
/// children of a missing or not-yet-enriched lecture returns empty
/// rather than erroring, which is also how callers verify a cascade
/// delete took everything with it.
pub struct StudyService {
    pub database: Arc<db::Database>,
}

impl StudyService {
    pub fn new(database: Arc<db::Database>) -> Self {
        Self { database }
    }

    pub async fn list_flashcards(&self, lecture_id: i64) -> Result<Vec<Flashcard>, PipelineError> {
        self.database
            .list_flashcards(lecture_id)
            .await
            .map_err(PipelineError::Persistence)
    }

    pub async fn list_quiz_questions(
        &self,
        lecture_id: i64,
    ) -> Result<Vec<QuizQuestion>, PipelineError> {
        self.database
            .list_quiz_questions(lecture_id)
            .await
            .map_err(PipelineError::Persistence)
    }
}
