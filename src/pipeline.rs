use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::db::Database;
use crate::llm::prompts;
use crate::llm::responses::{FlashcardBatch, LectureAnalysis, QuizBatch};
use crate::llm::LlmEngine;
use crate::logger::{error, info, warn, Component};
use crate::models::{
    LectureRecord, LectureStatus, LectureUpdate, NewFlashcard, NewLecture, NewQuizQuestion,
};
use crate::settings::AppSettings;
use crate::storage::{MediaStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Lecture not found")]
    NotFound,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub min_transcription_len: usize,
    pub background_enrich_threshold: usize,
    pub flashcard_count: usize,
    pub quiz_count: usize,
    pub prompt_transcript_max_chars: usize,
    pub llm_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_transcription_len: 10,
            background_enrich_threshold: 50,
            flashcard_count: 8,
            quiz_count: 6,
            prompt_transcript_max_chars: 3000,
            llm_timeout: Duration::from_secs(120),
        }
    }
}

impl PipelineConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            min_transcription_len: settings.pipeline.min_transcription_len,
            background_enrich_threshold: settings.pipeline.background_enrich_threshold,
            flashcard_count: settings.pipeline.flashcard_count,
            quiz_count: settings.pipeline.quiz_count,
            prompt_transcript_max_chars: settings.pipeline.prompt_transcript_max_chars,
            llm_timeout: Duration::from_secs(settings.llm.timeout_secs),
        }
    }
}

/// A lecture submission: raw audio plus the metadata the caller typed.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub file_name: String,
    pub audio: Vec<u8>,
    pub title: String,
    pub date: Option<String>, // ISO YYYY-MM-DD, defaults to today
}

/// Drives a submission through uploading -> processing -> completed or
/// failed, then fires the study-aid generation in the background.
/// Each submission is independent; the only shared state is the store.
pub struct LecturePipeline {
    database: Arc<Database>,
    media_store: Arc<dyn MediaStore>,
    llm: Arc<dyn LlmEngine>,
    config: PipelineConfig,
}

impl LecturePipeline {
    pub fn new(
        database: Arc<Database>,
        media_store: Arc<dyn MediaStore>,
        llm: Arc<dyn LlmEngine>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            database,
            media_store,
            llm,
            config,
        }
    }

    /// Run a submission to a terminal state. Resolves with the completed
    /// record, or with the failure after the record has been marked
    /// failed. Never leaves a record in uploading or processing.
    pub async fn submit(&self, request: SubmitRequest) -> Result<LectureRecord, PipelineError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(PipelineError::Validation(
                "Lecture title must not be empty".to_string(),
            ));
        }
        if request.audio.is_empty() {
            return Err(PipelineError::Validation(
                "Audio data must not be empty".to_string(),
            ));
        }

        let lecture_date = request
            .date
            .clone()
            .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());

        let record = self
            .database
            .create_lecture(NewLecture {
                title,
                lecture_date: Some(lecture_date),
                audio_url: None,
                status: LectureStatus::Uploading,
            })
            .await
            .map_err(PipelineError::Persistence)?;

        info(
            Component::Pipeline,
            &format!("Created lecture {} ({})", record.id, record.title),
        );

        match self.process(record.id, request).await {
            Ok(completed) => Ok(completed),
            Err(e) => {
                self.mark_failed(record.id, &e).await;
                Err(e)
            }
        }
    }

    /// Stages 1 and 2: upload the audio, then the primary enrichment
    /// call. Any error here is terminal for the submission.
    async fn process(
        &self,
        lecture_id: i64,
        request: SubmitRequest,
    ) -> Result<LectureRecord, PipelineError> {
        let media = self
            .media_store
            .upload(&request.file_name, request.audio)
            .await?;

        self.database
            .update_lecture(
                lecture_id,
                LectureUpdate {
                    audio_url: Some(media.url.clone()),
                    status: Some(LectureStatus::Processing),
                    ..Default::default()
                },
            )
            .await
            .map_err(PipelineError::Persistence)?;

        let analysis = self.primary_enrichment(&media.url).await?;

        // Mirror the loose contract of the service: empty strings count
        // as absent, same as omitted fields.
        let summary = analysis
            .summary
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "No summary available".to_string());
        let category = analysis
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "General".to_string());

        let completed = self
            .database
            .update_lecture(
                lecture_id,
                LectureUpdate {
                    transcription: Some(analysis.transcription.clone()),
                    summary: Some(summary),
                    category: Some(category.clone()),
                    key_points: Some(analysis.key_points.clone()),
                    exam_hints: Some(analysis.exam_hints.clone()),
                    status: Some(LectureStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .map_err(PipelineError::Persistence)?;

        info(
            Component::Pipeline,
            &format!("Lecture {} completed", lecture_id),
        );

        if analysis.transcription.chars().count() > self.config.background_enrich_threshold {
            self.spawn_background_enrichment(lecture_id, category, analysis.transcription);
        }

        Ok(completed)
    }

    async fn primary_enrichment(&self, audio_url: &str) -> Result<LectureAnalysis, PipelineError> {
        let request = prompts::analysis_request(audio_url);

        let value = tokio::time::timeout(self.config.llm_timeout, self.llm.invoke(request))
            .await
            .map_err(|_| {
                PipelineError::Enrichment(format!(
                    "Analysis timed out after {:?}",
                    self.config.llm_timeout
                ))
            })?
            .map_err(|e| PipelineError::Enrichment(e.to_string()))?;

        let analysis: LectureAnalysis = serde_json::from_value(value)
            .map_err(|e| PipelineError::Validation(format!("Malformed analysis response: {}", e)))?;

        if analysis.transcription.chars().count() < self.config.min_transcription_len {
            return Err(PipelineError::Enrichment(
                "Transcription failed - audio may be empty or format not supported".to_string(),
            ));
        }

        Ok(analysis)
    }

    /// Best-effort write-back after a terminal failure. Its own failure
    /// is logged so the original error stays visible to the caller.
    async fn mark_failed(&self, lecture_id: i64, cause: &PipelineError) {
        let update = LectureUpdate {
            status: Some(LectureStatus::Failed),
            transcription: Some(format!("Processing failed: {}", cause)),
            ..Default::default()
        };

        if let Err(e) = self.database.update_lecture(lecture_id, update).await {
            error(
                Component::Pipeline,
                &format!("Failed to mark lecture {} as failed: {}", lecture_id, e),
            );
        }
    }

    /// Stage 3: two independent fire-and-forget tasks. Neither blocks
    /// the caller, and neither can change the record's status.
    fn spawn_background_enrichment(
        &self,
        lecture_id: i64,
        category: String,
        transcription: String,
    ) {
        info(
            Component::Pipeline,
            &format!("Generating study aids for lecture {} in background", lecture_id),
        );

        let database = self.database.clone();
        let llm = self.llm.clone();
        let config = self.config.clone();
        let card_category = category.clone();
        let card_transcription = transcription.clone();
        tokio::spawn(async move {
            if let Err(e) = generate_flashcards(
                &database,
                llm.as_ref(),
                &config,
                lecture_id,
                &card_category,
                &card_transcription,
            )
            .await
            {
                warn(
                    Component::Pipeline,
                    &format!("Flashcard generation skipped for lecture {}: {}", lecture_id, e),
                );
            }
        });

        let database = self.database.clone();
        let llm = self.llm.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            if let Err(e) = generate_quiz(
                &database,
                llm.as_ref(),
                &config,
                lecture_id,
                &category,
                &transcription,
            )
            .await
            {
                warn(
                    Component::Pipeline,
                    &format!("Quiz generation skipped for lecture {}: {}", lecture_id, e),
                );
            }
        });
    }

    /// Cascade delete: study aids go first, then the lecture itself.
    /// A missing lecture reports not-found; missing children are fine.
    pub async fn delete(&self, lecture_id: i64) -> Result<(), PipelineError> {
        let (flashcards_result, quiz_result) = futures_util::future::join(
            self.database.delete_flashcards(lecture_id),
            self.database.delete_quiz_questions(lecture_id),
        )
        .await;

        flashcards_result.map_err(PipelineError::Persistence)?;
        quiz_result.map_err(PipelineError::Persistence)?;

        match self.database.delete_lecture(lecture_id).await {
            Ok(()) => {
                info(
                    Component::Pipeline,
                    &format!("Deleted lecture {} and its study aids", lecture_id),
                );
                Ok(())
            }
            Err(e) if e == "Lecture not found" => Err(PipelineError::NotFound),
            Err(e) => Err(PipelineError::Persistence(e)),
        }
    }
}

async fn generate_flashcards(
    database: &Database,
    llm: &dyn LlmEngine,
    config: &PipelineConfig,
    lecture_id: i64,
    category: &str,
    transcription: &str,
) -> Result<(), PipelineError> {
    let request = prompts::flashcard_request(
        transcription,
        config.flashcard_count,
        config.prompt_transcript_max_chars,
    );

    let value = llm
        .invoke(request)
        .await
        .map_err(|e| PipelineError::Enrichment(e.to_string()))?;
    let batch: FlashcardBatch = serde_json::from_value(value)?;

    if batch.flashcards.is_empty() {
        return Ok(());
    }

    // The lecture may have been deleted while the service worked; a
    // late bulk-create must not resurrect its children.
    if database
        .get_lecture(lecture_id)
        .await
        .map_err(PipelineError::Persistence)?
        .is_none()
    {
        warn(
            Component::Pipeline,
            &format!("Lecture {} is gone, dropping generated flashcards", lecture_id),
        );
        return Ok(());
    }

    let cards: Vec<NewFlashcard> = batch
        .flashcards
        .into_iter()
        .map(|item| NewFlashcard {
            question: item.question,
            answer: item.answer,
            difficulty: item
                .difficulty
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "medium".to_string()),
            category: category.to_string(),
        })
        .collect();

    let count = cards.len();
    database
        .insert_flashcards(lecture_id, cards)
        .await
        .map_err(PipelineError::Persistence)?;

    info(
        Component::Pipeline,
        &format!("Stored {} flashcards for lecture {}", count, lecture_id),
    );

    Ok(())
}

async fn generate_quiz(
    database: &Database,
    llm: &dyn LlmEngine,
    config: &PipelineConfig,
    lecture_id: i64,
    category: &str,
    transcription: &str,
) -> Result<(), PipelineError> {
    let request = prompts::quiz_request(
        transcription,
        config.quiz_count,
        config.prompt_transcript_max_chars,
    );

    let value = llm
        .invoke(request)
        .await
        .map_err(|e| PipelineError::Enrichment(e.to_string()))?;
    let batch: QuizBatch = serde_json::from_value(value)?;

    if batch.questions.is_empty() {
        return Ok(());
    }

    if database
        .get_lecture(lecture_id)
        .await
        .map_err(PipelineError::Persistence)?
        .is_none()
    {
        warn(
            Component::Pipeline,
            &format!("Lecture {} is gone, dropping generated quiz", lecture_id),
        );
        return Ok(());
    }

    let questions: Vec<NewQuizQuestion> = batch
        .questions
        .into_iter()
        .map(|item| NewQuizQuestion {
            question: item.question,
            options: item.options,
            correct_answer: item.correct_answer,
            explanation: item.explanation,
            category: category.to_string(),
        })
        .collect();

    let count = questions.len();
    database
        .insert_quiz_questions(lecture_id, questions)
        .await
        .map_err(PipelineError::Persistence)?;

    info(
        Component::Pipeline,
        &format!("Stored {} quiz questions for lecture {}", count, lecture_id),
    );

    Ok(())
}
