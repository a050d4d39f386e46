use serde_json::json;

use crate::llm::LlmRequest;

/// Prompt sent with the audio reference for the primary enrichment
/// pass. The service must return the full transcript plus the study
/// metadata in one structured response.
const ANALYSIS_PROMPT: &str = "Transcribe this lecture audio file completely and provide:\n\
1. Full word-for-word transcription of everything said\n\
2. A 2-3 sentence summary\n\
3. Academic category (Sociology, Science, Mathematics, History, Literature, Business, Psychology, Engineering, or Arts)\n\
4. 5-8 key points with timestamps in MM:SS format and importance level (high/medium/normal)\n\
5. Any exam hints mentioned with timestamps\n\
\n\
Format as JSON.";

const FLASHCARD_PROMPT: &str = "Create {count} flashcards from this lecture. Return as JSON with flashcards array containing question, answer, and difficulty (easy/medium/hard) fields:\n\n{transcript}";

const QUIZ_PROMPT: &str = "Create {count} multiple choice questions from this lecture. Return as JSON with questions array containing question, options (array of 4), correct_answer, and explanation fields:\n\n{transcript}";

/// Keep prompts bounded: the study-aid passes only see the head of the
/// transcript, not the whole thing.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub fn analysis_request(audio_url: &str) -> LlmRequest {
    LlmRequest {
        prompt: ANALYSIS_PROMPT.to_string(),
        file_urls: vec![audio_url.to_string()],
        response_schema: Some(json!({
            "type": "object",
            "properties": {
                "transcription": { "type": "string" },
                "summary": { "type": "string" },
                "category": { "type": "string" },
                "key_points": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "point": { "type": "string" },
                            "timestamp": { "type": "string" },
                            "importance": { "type": "string" }
                        }
                    }
                },
                "exam_hints": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "hint": { "type": "string" },
                            "timestamp": { "type": "string" }
                        }
                    }
                }
            }
        })),
    }
}

pub fn flashcard_request(transcript: &str, count: usize, max_chars: usize) -> LlmRequest {
    let prompt = FLASHCARD_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{transcript}", &truncate_chars(transcript, max_chars));

    LlmRequest {
        prompt,
        file_urls: Vec::new(),
        response_schema: Some(json!({
            "type": "object",
            "properties": {
                "flashcards": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "answer": { "type": "string" },
                            "difficulty": { "type": "string" }
                        }
                    }
                }
            }
        })),
    }
}

pub fn quiz_request(transcript: &str, count: usize, max_chars: usize) -> LlmRequest {
    let prompt = QUIZ_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{transcript}", &truncate_chars(transcript, max_chars));

    LlmRequest {
        prompt,
        file_urls: Vec::new(),
        response_schema: Some(json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "options": { "type": "array", "items": { "type": "string" } },
                            "correct_answer": { "type": "string" },
                            "explanation": { "type": "string" }
                        }
                    }
                }
            }
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request_carries_audio_url() {
        let request = analysis_request("https://media.example/lecture.mp3");
        assert_eq!(request.file_urls, vec!["https://media.example/lecture.mp3"]);
        assert!(request.prompt.contains("word-for-word transcription"));
        assert!(request.response_schema.is_some());
    }

    #[test]
    fn test_flashcard_prompt_substitution() {
        let request = flashcard_request("Cells divide by mitosis.", 8, 3000);
        assert!(request.prompt.starts_with("Create 8 flashcards"));
        assert!(request.prompt.ends_with("Cells divide by mitosis."));
        assert!(request.file_urls.is_empty());
    }

    #[test]
    fn test_quiz_prompt_substitution() {
        let request = quiz_request("The market clears at equilibrium.", 6, 3000);
        assert!(request.prompt.starts_with("Create 6 multiple choice questions"));
        assert!(request.prompt.contains("options (array of 4)"));
    }

    #[test]
    fn test_transcript_truncated_for_study_aids() {
        let transcript = "x".repeat(5000);
        let request = flashcard_request(&transcript, 8, 3000);
        let head_len = FLASHCARD_PROMPT
            .replace("{count}", "8")
            .replace("{transcript}", "")
            .chars()
            .count();
        assert_eq!(request.prompt.chars().count(), head_len + 3000);
    }
}
