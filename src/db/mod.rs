use sqlx::{migrate::MigrateDatabase, Pool, Sqlite, SqlitePool};
use std::path::Path;

use crate::models::{
    Flashcard, LectureRecord, LectureUpdate, NewFlashcard, NewLecture, NewQuizQuestion,
    QuizQuestion,
};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(db_path: &Path) -> Result<Self, String> {
        let db_url = format!("sqlite:{}", db_path.display());

        // Create database if it doesn't exist
        if !Sqlite::database_exists(&db_url)
            .await
            .map_err(|e| format!("Failed to check database existence: {}", e))?
        {
            Sqlite::create_database(&db_url)
                .await
                .map_err(|e| format!("Failed to create database: {}", e))?;
        }

        // Connect to database
        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(|e| format!("Failed to connect to database: {}", e))?;

        // Create tables
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lectures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                lecture_date TEXT,
                audio_url TEXT,
                status TEXT NOT NULL DEFAULT 'uploading',
                transcription TEXT,
                summary TEXT,
                category TEXT,
                key_points TEXT,
                exam_hints TEXT,
                created_at TEXT DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_lectures_created_at ON lectures(created_at);
            CREATE INDEX IF NOT EXISTS idx_lectures_status ON lectures(status);

            CREATE TABLE IF NOT EXISTS flashcards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lecture_id INTEGER NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                difficulty TEXT NOT NULL DEFAULT 'medium',
                category TEXT NOT NULL DEFAULT 'General',
                created_at TEXT DEFAULT (datetime('now')),
                FOREIGN KEY (lecture_id) REFERENCES lectures(id)
            );

            CREATE INDEX IF NOT EXISTS idx_flashcards_lecture_id ON flashcards(lecture_id);

            CREATE TABLE IF NOT EXISTS quiz_questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lecture_id INTEGER NOT NULL,
                question TEXT NOT NULL,
                options TEXT NOT NULL,
                correct_answer TEXT NOT NULL,
                explanation TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'General',
                created_at TEXT DEFAULT (datetime('now')),
                FOREIGN KEY (lecture_id) REFERENCES lectures(id)
            );

            CREATE INDEX IF NOT EXISTS idx_quiz_questions_lecture_id ON quiz_questions(lecture_id);
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| format!("Failed to create tables: {}", e))?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn create_lecture(&self, lecture: NewLecture) -> Result<LectureRecord, String> {
        let result = sqlx::query(
            r#"
            INSERT INTO lectures (title, lecture_date, audio_url, status)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&lecture.title)
        .bind(&lecture.lecture_date)
        .bind(&lecture.audio_url)
        .bind(lecture.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create lecture: {}", e))?;

        let id = result.last_insert_rowid();

        // Fetch the newly created lecture to return it
        self.get_lecture(id)
            .await?
            .ok_or_else(|| "Failed to fetch newly created lecture".to_string())
    }

    pub async fn get_lecture(&self, id: i64) -> Result<Option<LectureRecord>, String> {
        let lecture = sqlx::query_as::<_, LectureRecord>(
            r#"
            SELECT id, title, lecture_date, audio_url, status, transcription,
                   summary, category, key_points, exam_hints, created_at
            FROM lectures
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to get lecture: {}", e))?;

        Ok(lecture)
    }

    pub async fn list_lectures(&self, limit: i64) -> Result<Vec<LectureRecord>, String> {
        let lectures = sqlx::query_as::<_, LectureRecord>(
            r#"
            SELECT id, title, lecture_date, audio_url, status, transcription,
                   summary, category, key_points, exam_hints, created_at
            FROM lectures
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list lectures: {}", e))?;

        Ok(lectures)
    }

    /// Partial update: only the fields set on `update` are written.
    pub async fn update_lecture(
        &self,
        id: i64,
        update: LectureUpdate,
    ) -> Result<LectureRecord, String> {
        // First, get the existing lecture to preserve unchanged fields
        let existing = self
            .get_lecture(id)
            .await?
            .ok_or_else(|| "Lecture not found".to_string())?;

        let audio_url = update.audio_url.or(existing.audio_url);
        let status = update
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let transcription = update.transcription.or(existing.transcription);
        let summary = update.summary.or(existing.summary);
        let category = update.category.or(existing.category);
        let key_points = match update.key_points {
            Some(points) => Some(
                serde_json::to_string(&points)
                    .map_err(|e| format!("Failed to serialize key points: {}", e))?,
            ),
            None => existing.key_points,
        };
        let exam_hints = match update.exam_hints {
            Some(hints) => Some(
                serde_json::to_string(&hints)
                    .map_err(|e| format!("Failed to serialize exam hints: {}", e))?,
            ),
            None => existing.exam_hints,
        };

        sqlx::query(
            r#"
            UPDATE lectures
            SET audio_url = ?1, status = ?2, transcription = ?3, summary = ?4,
                category = ?5, key_points = ?6, exam_hints = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&audio_url)
        .bind(&status)
        .bind(&transcription)
        .bind(&summary)
        .bind(&category)
        .bind(&key_points)
        .bind(&exam_hints)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update lecture: {}", e))?;

        // Fetch the updated lecture
        self.get_lecture(id)
            .await?
            .ok_or_else(|| "Failed to fetch updated lecture".to_string())
    }

    pub async fn delete_lecture(&self, id: i64) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM lectures WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete lecture: {}", e))?;

        if result.rows_affected() == 0 {
            return Err("Lecture not found".to_string());
        }

        Ok(())
    }

    pub async fn insert_flashcards(
        &self,
        lecture_id: i64,
        cards: Vec<NewFlashcard>,
    ) -> Result<(), String> {
        if cards.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to begin transaction: {}", e))?;

        for card in cards {
            sqlx::query(
                r#"
                INSERT INTO flashcards (lecture_id, question, answer, difficulty, category)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(lecture_id)
            .bind(&card.question)
            .bind(&card.answer)
            .bind(&card.difficulty)
            .bind(&card.category)
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to insert flashcard: {}", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit transaction: {}", e))?;

        Ok(())
    }

    pub async fn list_flashcards(&self, lecture_id: i64) -> Result<Vec<Flashcard>, String> {
        let cards = sqlx::query_as::<_, Flashcard>(
            r#"
            SELECT id, lecture_id, question, answer, difficulty, category, created_at
            FROM flashcards
            WHERE lecture_id = ?1
            ORDER BY id
            "#,
        )
        .bind(lecture_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list flashcards: {}", e))?;

        Ok(cards)
    }

    /// Deleting zero rows is fine here; the cascade must not fail on a
    /// lecture that has no study aids yet.
    pub async fn delete_flashcards(&self, lecture_id: i64) -> Result<(), String> {
        sqlx::query("DELETE FROM flashcards WHERE lecture_id = ?1")
            .bind(lecture_id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete flashcards: {}", e))?;

        Ok(())
    }

    pub async fn insert_quiz_questions(
        &self,
        lecture_id: i64,
        questions: Vec<NewQuizQuestion>,
    ) -> Result<(), String> {
        if questions.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to begin transaction: {}", e))?;

        for question in questions {
            let options_json = serde_json::to_string(&question.options)
                .map_err(|e| format!("Failed to serialize options: {}", e))?;

            sqlx::query(
                r#"
                INSERT INTO quiz_questions (lecture_id, question, options, correct_answer, explanation, category)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(lecture_id)
            .bind(&question.question)
            .bind(&options_json)
            .bind(&question.correct_answer)
            .bind(&question.explanation)
            .bind(&question.category)
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to insert quiz question: {}", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit transaction: {}", e))?;

        Ok(())
    }

    pub async fn list_quiz_questions(&self, lecture_id: i64) -> Result<Vec<QuizQuestion>, String> {
        let questions = sqlx::query_as::<_, QuizQuestion>(
            r#"
            SELECT id, lecture_id, question, options, correct_answer, explanation, category, created_at
            FROM quiz_questions
            WHERE lecture_id = ?1
            ORDER BY id
            "#,
        )
        .bind(lecture_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list quiz questions: {}", e))?;

        Ok(questions)
    }

    pub async fn delete_quiz_questions(&self, lecture_id: i64) -> Result<(), String> {
        sqlx::query("DELETE FROM quiz_questions WHERE lecture_id = ?1")
            .bind(lecture_id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete quiz questions: {}", e))?;

        Ok(())
    }
}
