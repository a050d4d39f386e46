#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use lectern_lib::db::Database;
use lectern_lib::llm::{LlmEngine, LlmError, LlmRequest};
use lectern_lib::models::{Flashcard, QuizQuestion};
use lectern_lib::storage::{MediaStore, StorageError, UploadedMedia};

/// Create a test database in a temporary directory. The TempDir must be
/// kept alive for the duration of the test.
pub async fn create_test_db() -> (Arc<Database>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let database = Database::new(&temp_dir.path().join("test.db"))
        .await
        .unwrap();
    (Arc::new(database), temp_dir)
}

/// Which of the three remote calls a request is, recognized the same way
/// the service would: analysis carries file references, the study-aid
/// prompts are distinguished by their wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Analysis,
    Flashcards,
    Quiz,
}

pub fn classify(request: &LlmRequest) -> RequestKind {
    if !request.file_urls.is_empty() {
        RequestKind::Analysis
    } else if request.prompt.contains("flashcards") {
        RequestKind::Flashcards
    } else {
        RequestKind::Quiz
    }
}

/// Scriptable in-memory LLM. Each request kind gets one scripted reply
/// (value or failure) and an optional artificial latency, so tests can
/// exercise the concurrent background tasks deterministically.
pub struct MockLlmEngine {
    responses: Mutex<HashMap<RequestKind, Result<Value, String>>>,
    delays: Mutex<HashMap<RequestKind, Duration>>,
    calls: Mutex<Vec<LlmRequest>>,
}

impl MockLlmEngine {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, kind: RequestKind, value: Value) {
        self.responses.lock().unwrap().insert(kind, Ok(value));
    }

    pub fn fail(&self, kind: RequestKind, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(kind, Err(message.to_string()));
    }

    pub fn delay(&self, kind: RequestKind, delay: Duration) {
        self.delays.lock().unwrap().insert(kind, delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_of(&self, kind: RequestKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| classify(r) == kind)
            .count()
    }

    pub fn last_prompt_of(&self, kind: RequestKind) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| classify(r) == kind)
            .map(|r| r.prompt.clone())
    }

    pub fn last_request_of(&self, kind: RequestKind) -> Option<LlmRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| classify(r) == kind)
            .cloned()
    }
}

#[async_trait]
impl LlmEngine for MockLlmEngine {
    async fn invoke(&self, request: LlmRequest) -> Result<Value, LlmError> {
        let kind = classify(&request);
        let delay = self.delays.lock().unwrap().get(&kind).copied();
        self.calls.lock().unwrap().push(request);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.lock().unwrap().get(&kind) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(LlmError::Service(message.clone())),
            None => Err(LlmError::Service(format!(
                "no scripted response for {:?}",
                kind
            ))),
        }
    }
}

/// In-memory media store: returns a fixed URL, or a scripted rejection.
pub struct MockMediaStore {
    url: String,
    fail_with: Mutex<Option<String>>,
    uploads: Mutex<Vec<String>>,
}

impl MockMediaStore {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            fail_with: Mutex::new(None),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(
        &self,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedMedia, StorageError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(StorageError::Rejected(message));
        }

        self.uploads.lock().unwrap().push(file_name.to_string());
        Ok(UploadedMedia {
            url: self.url.clone(),
        })
    }
}

/// A transcript comfortably above the background-enrichment threshold.
pub const LONG_TRANSCRIPT: &str = "Today we cover cellular respiration in depth. \
    Glycolysis splits glucose into pyruvate, the Krebs cycle extracts electron \
    carriers, and the electron transport chain produces most of the ATP. \
    Remember the net yield numbers for the exam.";

/// A full analysis reply with every field populated.
pub fn analysis_json(transcription: &str) -> Value {
    json!({
        "transcription": transcription,
        "summary": "An overview of cellular respiration and ATP yield.",
        "category": "Science",
        "key_points": [
            {"point": "Glycolysis splits glucose", "timestamp": "02:15", "importance": "high"},
            {"point": "Electron transport produces most ATP", "timestamp": "18:40", "importance": "normal"}
        ],
        "exam_hints": [
            {"hint": "Know the net ATP yield", "timestamp": "19:05"}
        ]
    })
}

pub fn flashcard_batch_json(count: usize) -> Value {
    let cards: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "question": format!("Question {}", i),
                "answer": format!("Answer {}", i),
                "difficulty": "easy"
            })
        })
        .collect();
    json!({ "flashcards": cards })
}

pub fn quiz_batch_json(count: usize) -> Value {
    let questions: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "question": format!("Question {}", i),
                "options": ["A", "B", "C", "D"],
                "correct_answer": "B",
                "explanation": format!("Explanation {}", i)
            })
        })
        .collect();
    json!({ "questions": questions })
}

/// Poll until the lecture has at least `expected` flashcards.
pub async fn wait_for_flashcards(
    database: &Database,
    lecture_id: i64,
    expected: usize,
) -> Vec<Flashcard> {
    for _ in 0..200 {
        let cards = database.list_flashcards(lecture_id).await.unwrap();
        if cards.len() >= expected {
            return cards;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {} flashcards", expected);
}

/// Poll until the lecture has at least `expected` quiz questions.
pub async fn wait_for_quiz(
    database: &Database,
    lecture_id: i64,
    expected: usize,
) -> Vec<QuizQuestion> {
    for _ in 0..200 {
        let questions = database.list_quiz_questions(lecture_id).await.unwrap();
        if questions.len() >= expected {
            return questions;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {} quiz questions", expected);
}

/// Poll until the mock has served at least `expected` requests, then
/// give any in-flight task a moment to finish its write.
pub async fn wait_for_llm_calls(llm: &MockLlmEngine, expected: usize) {
    for _ in 0..200 {
        if llm.call_count() >= expected {
            tokio::time::sleep(Duration::from_millis(50)).await;
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {} LLM calls", expected);
}
