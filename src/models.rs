use serde::{Deserialize, Serialize};

/// Lifecycle of a lecture record. Transitions only move forward:
/// Uploading -> Processing -> Completed | Failed. Terminal states are
/// final; a failed lecture is retried by submitting again, not by
/// resuming in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LectureStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl LectureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LectureStatus::Uploading => "uploading",
            LectureStatus::Processing => "processing",
            LectureStatus::Completed => "completed",
            LectureStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploading" => Some(LectureStatus::Uploading),
            "processing" => Some(LectureStatus::Processing),
            "completed" => Some(LectureStatus::Completed),
            "failed" => Some(LectureStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LectureStatus::Completed | LectureStatus::Failed)
    }
}

/// One extracted key point. `timestamp` is "MM:SS" when the service
/// provides one; `importance` is high, medium, or normal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPoint {
    pub point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default = "default_importance")]
    pub importance: String,
}

fn default_importance() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamHint {
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LectureRecord {
    pub id: i64,
    pub title: String,
    pub lecture_date: Option<String>, // ISO YYYY-MM-DD
    pub audio_url: Option<String>,
    pub status: String,
    pub transcription: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub key_points: Option<String>, // JSON array of KeyPoint
    pub exam_hints: Option<String>, // JSON array of ExamHint
    pub created_at: String,
}

impl LectureRecord {
    pub fn status(&self) -> Option<LectureStatus> {
        LectureStatus::parse(&self.status)
    }

    /// Parsed key points; an absent or malformed column reads as empty.
    pub fn key_points(&self) -> Vec<KeyPoint> {
        self.key_points
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }

    pub fn exam_hints(&self) -> Vec<ExamHint> {
        self.exam_hints
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLecture {
    pub title: String,
    pub lecture_date: Option<String>,
    pub audio_url: Option<String>,
    pub status: LectureStatus,
}

/// Partial update; only populated fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LectureUpdate {
    pub audio_url: Option<String>,
    pub status: Option<LectureStatus>,
    pub transcription: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub key_points: Option<Vec<KeyPoint>>,
    pub exam_hints: Option<Vec<ExamHint>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Flashcard {
    pub id: i64,
    pub lecture_id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: String, // easy, medium, or hard
    pub category: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlashcard {
    pub question: String,
    pub answer: String,
    pub difficulty: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuizQuestion {
    pub id: i64,
    pub lecture_id: i64,
    pub question: String,
    pub options: String, // JSON array of 4 strings
    pub correct_answer: String,
    pub explanation: String,
    pub category: String,
    pub created_at: String,
}

impl QuizQuestion {
    pub fn options(&self) -> Vec<String> {
        serde_json::from_str(&self.options).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub category: String,
}
