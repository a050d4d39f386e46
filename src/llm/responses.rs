use serde::Deserialize;

use crate::models::{ExamHint, KeyPoint};

/// Structured payload of the primary enrichment call. Only the
/// transcription is load-bearing; everything else is defaulted
/// downstream when the service leaves it out.
#[derive(Debug, Clone, Deserialize)]
pub struct LectureAnalysis {
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
    #[serde(default)]
    pub exam_hints: Vec<ExamHint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardBatch {
    #[serde(default)]
    pub flashcards: Vec<FlashcardItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardItem {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizBatch {
    #[serde(default)]
    pub questions: Vec<QuizItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizItem {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}
