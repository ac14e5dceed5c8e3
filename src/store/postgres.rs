// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    error::AppError,
    models::{
        category::Category,
        question::{AnswerChoice, NewBankQuestion, Question},
        quiz::Quiz,
        stats::{AttemptRecord, QuizStats},
    },
    store::QuizStore,
};

/// Row of the 'quizzes' table. Embedded documents live in JSONB columns.
#[derive(FromRow)]
struct QuizRow {
    quiz_id: String,
    code_value: String,
    code_name: String,
    num_questions: i32,
    min_correct: i32,
    is_custom_quiz: bool,
    questions: Option<Json<Vec<Question>>>,
    categories: Option<Json<Vec<i64>>>,
    stats: Option<Json<QuizStats>>,
    created_at: DateTime<Utc>,
}

impl From<QuizRow> for Quiz {
    fn from(row: QuizRow) -> Self {
        Quiz {
            quiz_id: row.quiz_id,
            code_value: row.code_value,
            code_name: row.code_name,
            num_questions: row.num_questions,
            min_correct: row.min_correct,
            is_custom_quiz: row.is_custom_quiz,
            questions: row.questions.map(|q| q.0),
            categories: row.categories.map(|c| c.0),
            stats: row.stats.map(|s| s.0),
            created_at: row.created_at,
        }
    }
}

/// Row of the 'questions' table (the shared bank).
#[derive(FromRow)]
struct BankQuestionRow {
    question_id: i64,
    category_id: i64,
    question: String,
    correct_id: i64,
    answer_choices: Json<Vec<AnswerChoice>>,
}

impl From<BankQuestionRow> for Question {
    fn from(row: BankQuestionRow) -> Self {
        Question {
            question_id: row.question_id,
            category_id: Some(row.category_id),
            question: row.question,
            correct_id: row.correct_id,
            answer_choices: row.answer_choices.0,
        }
    }
}

/// Postgres-backed quiz store.
///
/// The pool is process-wide and may be created with `connect_lazy`; the first
/// query establishes the connection.
#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn quiz_id_exists(&self, quiz_id: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM quizzes WHERE quiz_id = $1)")
                .bind(quiz_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO quizzes (
                quiz_id, code_value, code_name, num_questions, min_correct,
                is_custom_quiz, questions, categories, stats, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (quiz_id) DO NOTHING
            "#,
        )
        .bind(&quiz.quiz_id)
        .bind(&quiz.code_value)
        .bind(&quiz.code_name)
        .bind(quiz.num_questions)
        .bind(quiz.min_correct)
        .bind(quiz.is_custom_quiz)
        .bind(quiz.questions.as_ref().map(Json))
        .bind(quiz.categories.as_ref().map(Json))
        .bind(quiz.stats.as_ref().map(Json))
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz {}: {:?}", quiz.quiz_id, e);
            AppError::from(e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, AppError> {
        let row = sqlx::query_as::<_, QuizRow>(
            r#"
            SELECT
                quiz_id, code_value, code_name, num_questions, min_correct,
                is_custom_quiz, questions, categories, stats, created_at
            FROM quizzes
            WHERE quiz_id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Quiz::from))
    }

    async fn sample_bank_questions(
        &self,
        categories: &[i64],
        size: usize,
    ) -> Result<Vec<Question>, AppError> {
        let limit = i64::try_from(size).unwrap_or(i64::MAX);

        let result = if categories.is_empty() {
            sqlx::query_as::<_, BankQuestionRow>(
                r#"
                SELECT question_id, category_id, question, correct_id, answer_choices
                FROM questions
                ORDER BY RANDOM()
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, BankQuestionRow>(
                r#"
                SELECT question_id, category_id, question, correct_id, answer_choices
                FROM questions
                WHERE category_id = ANY($1)
                ORDER BY RANDOM()
                LIMIT $2
                "#,
            )
            .bind(categories)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        };

        let rows = result.map_err(|e| {
            tracing::error!("Failed to sample bank questions: {:?}", e);
            AppError::from(e)
        })?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn bank_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, BankQuestionRow>(
            r#"
            SELECT question_id, category_id, question, correct_id, answer_choices
            FROM questions
            WHERE question_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn record_attempt(
        &self,
        quiz_id: &str,
        attempt: AttemptRecord,
    ) -> Result<Option<QuizStats>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent gradings of the same quiz.
        let current: Option<(Option<Json<QuizStats>>,)> =
            sqlx::query_as("SELECT stats FROM quizzes WHERE quiz_id = $1 FOR UPDATE")
                .bind(quiz_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((stats,)) = current else {
            return Ok(None);
        };

        let mut stats = stats.map(|s| s.0).unwrap_or_default();
        stats.record(attempt);

        sqlx::query("UPDATE quizzes SET stats = $2 WHERE quiz_id = $1")
            .bind(quiz_id)
            .bind(Json(&stats))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update stats for {}: {:?}", quiz_id, e);
                AppError::from(e)
            })?;

        tx.commit().await?;

        Ok(Some(stats))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, category_name, description
            FROM categories
            ORDER BY category_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch categories: {:?}", e);
            AppError::from(e)
        })?;

        Ok(categories)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT category_id, category_name, description FROM categories WHERE category_name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn insert_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (category_name, description)
            VALUES ($1, $2)
            RETURNING category_id, category_name, description
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                AppError::BadRequest(format!("Category '{}' already exists", name))
            } else {
                AppError::from(e)
            }
        })?;

        Ok(category)
    }

    async fn insert_bank_question(&self, new: NewBankQuestion) -> Result<Question, AppError> {
        let row = sqlx::query_as::<_, BankQuestionRow>(
            r#"
            INSERT INTO questions (category_id, question, correct_id, answer_choices)
            VALUES ($1, $2, $3, $4)
            RETURNING question_id, category_id, question, correct_id, answer_choices
            "#,
        )
        .bind(new.category_id)
        .bind(&new.question)
        .bind(new.correct_id)
        .bind(Json(&new.answer_choices))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
