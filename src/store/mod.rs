// src/store/mod.rs

//! The quiz store: quiz documents, the categorized question bank, and
//! per-quiz statistics.
//!
//! Handlers only ever see `Arc<dyn QuizStore>`, so the Postgres-backed store
//! used in production and the in-memory one used by tests are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        category::Category,
        question::{NewBankQuestion, Question},
        quiz::Quiz,
        stats::{AttemptRecord, QuizStats},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryQuizStore;
pub use postgres::PgQuizStore;

pub type DynQuizStore = Arc<dyn QuizStore>;

#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Connectivity probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn quiz_id_exists(&self, quiz_id: &str) -> Result<bool, AppError>;

    /// Inserts the quiz unless its id is taken. Returns `false` on conflict;
    /// an existing quiz is never overwritten.
    async fn insert_quiz(&self, quiz: &Quiz) -> Result<bool, AppError>;

    async fn find_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, AppError>;

    /// Uniform sample of up to `size` bank questions without replacement,
    /// restricted to `categories` unless it is empty.
    async fn sample_bank_questions(
        &self,
        categories: &[i64],
        size: usize,
    ) -> Result<Vec<Question>, AppError>;

    async fn bank_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError>;

    /// Folds one attempt into the quiz's statistics as a single atomic step
    /// and returns the updated statistics, or `None` if the quiz is gone.
    async fn record_attempt(
        &self,
        quiz_id: &str,
        attempt: AttemptRecord,
    ) -> Result<Option<QuizStats>, AppError>;

    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;

    async fn insert_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError>;

    async fn insert_bank_question(&self, question: NewBankQuestion) -> Result<Question, AppError>;
}
