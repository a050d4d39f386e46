//! Lectern: a headless lecture-capture processing engine. Submitted
//! audio is transcribed and enriched by a remote service, and the
//! results land in SQLite as lecture records with study-aid children.

// Public API modules
pub mod db;
pub mod heuristics;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod services;
pub mod storage;

// Core functionality - kept at root for wide usage
pub mod logger;
pub mod settings;

// Re-export commonly used types
pub use models::{
    ExamHint, Flashcard, KeyPoint, LectureRecord, LectureStatus, QuizQuestion,
};
pub use pipeline::{LecturePipeline, PipelineConfig, PipelineError, SubmitRequest};
pub use services::{AccessGate, LecturesService, StudyService};
