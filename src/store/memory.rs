// src/store/memory.rs

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        category::Category,
        question::{NewBankQuestion, Question},
        quiz::Quiz,
        stats::{AttemptRecord, QuizStats},
    },
    store::QuizStore,
};

#[derive(Default)]
struct Inner {
    quizzes: HashMap<String, Quiz>,
    categories: Vec<Category>,
    questions: Vec<Question>,
    next_category_id: i64,
    next_question_id: i64,
}

/// Process-local store behind a single lock.
///
/// Every trait operation takes the lock once, so conditional inserts and
/// statistics updates are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryQuizStore {
    inner: RwLock<Inner>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn quiz_id_exists(&self, quiz_id: &str) -> Result<bool, AppError> {
        Ok(self.inner.read().await.quizzes.contains_key(quiz_id))
    }

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        if inner.quizzes.contains_key(&quiz.quiz_id) {
            return Ok(false);
        }
        inner.quizzes.insert(quiz.quiz_id.clone(), quiz.clone());
        Ok(true)
    }

    async fn find_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, AppError> {
        Ok(self.inner.read().await.quizzes.get(quiz_id).cloned())
    }

    async fn sample_bank_questions(
        &self,
        categories: &[i64],
        size: usize,
    ) -> Result<Vec<Question>, AppError> {
        let inner = self.inner.read().await;
        let pool: Vec<&Question> = inner
            .questions
            .iter()
            .filter(|q| {
                categories.is_empty()
                    || q.category_id.is_some_and(|id| categories.contains(&id))
            })
            .collect();

        let mut rng = StdRng::from_entropy();
        Ok(pool
            .choose_multiple(&mut rng, size)
            .map(|q| (*q).clone())
            .collect())
    }

    async fn bank_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        let inner = self.inner.read().await;
        Ok(inner
            .questions
            .iter()
            .filter(|q| wanted.contains(&q.question_id))
            .cloned()
            .collect())
    }

    async fn record_attempt(
        &self,
        quiz_id: &str,
        attempt: AttemptRecord,
    ) -> Result<Option<QuizStats>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(quiz) = inner.quizzes.get_mut(quiz_id) else {
            return Ok(None);
        };

        let stats = quiz.stats.get_or_insert_with(QuizStats::default);
        stats.record(attempt);
        Ok(Some(stats.clone()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.inner.read().await.categories.clone();
        categories.sort_by(|a, b| a.category_name.cmp(&b.category_name));
        Ok(categories)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .iter()
            .find(|c| c.category_name == name)
            .cloned())
    }

    async fn insert_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        let mut inner = self.inner.write().await;
        if inner.categories.iter().any(|c| c.category_name == name) {
            return Err(AppError::BadRequest(format!(
                "Category '{}' already exists",
                name
            )));
        }

        inner.next_category_id += 1;
        let category = Category {
            category_id: inner.next_category_id,
            category_name: name.to_string(),
            description: description.map(String::from),
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_bank_question(&self, new: NewBankQuestion) -> Result<Question, AppError> {
        let mut inner = self.inner.write().await;
        if !inner
            .categories
            .iter()
            .any(|c| c.category_id == new.category_id)
        {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                new.category_id
            )));
        }

        inner.next_question_id += 1;
        let question = Question {
            question_id: inner.next_question_id,
            category_id: Some(new.category_id),
            question: new.question,
            correct_id: new.correct_id,
            answer_choices: new.answer_choices,
        };
        inner.questions.push(question.clone());
        Ok(question)
    }
}
