use std::sync::Arc;

use crate::db;
use crate::models::LectureRecord;
use crate::pipeline::{LecturePipeline, PipelineError, SubmitRequest};

/// Request/response surface the presentation layer calls for lecture
/// lifecycle operations.
pub struct LecturesService {
    pub database: Arc<db::Database>,
    pub pipeline: Arc<LecturePipeline>,
}

impl LecturesService {
    pub fn new(database: Arc<db::Database>, pipeline: Arc<LecturePipeline>) -> Self {
        Self { database, pipeline }
    }

    pub async fn submit_lecture(
        &self,
        request: SubmitRequest,
    ) -> Result<LectureRecord, PipelineError> {
        self.pipeline.submit(request).await
    }

    pub async fn get_lecture(&self, id: i64) -> Result<LectureRecord, PipelineError> {
        self.database
            .get_lecture(id)
            .await
            .map_err(PipelineError::Persistence)?
            .ok_or(PipelineError::NotFound)
    }

    /// Most recent lectures first, capped at `limit`.
    pub async fn list_lectures(&self, limit: i64) -> Result<Vec<LectureRecord>, PipelineError> {
        self.database
            .list_lectures(limit)
            .await
            .map_err(PipelineError::Persistence)
    }

    pub async fn delete_lecture(&self, id: i64) -> Result<(), PipelineError> {
        self.pipeline.delete(id).await
    }
}
