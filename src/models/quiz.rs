// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    question::{CreateQuestionRequest, PublicQuestion, Question},
    stats::{QuizStats, StatsSummary},
};

/// A stored quiz document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Human-readable identifier derived from `code_name`.
    pub quiz_id: String,

    /// The reward disclosed only on a passing attempt.
    pub code_value: String,

    /// Display label.
    pub code_name: String,

    pub num_questions: i32,
    pub min_correct: i32,
    pub is_custom_quiz: bool,

    /// Authored questions, custom quizzes only.
    pub questions: Option<Vec<Question>>,

    /// Bank categories to draw from, generated quizzes only. Empty means any.
    pub categories: Option<Vec<i64>>,

    pub created_at: DateTime<Utc>,

    pub stats: Option<QuizStats>,
}

/// DTO for creating a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "code_value must be between 1 and 100 characters."
    ))]
    pub code_value: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "code_name must be between 1 and 100 characters."
    ))]
    pub code_name: String,
    #[validate(range(min = 1, max = 25, message = "num_questions must be between 1 and 25"))]
    pub num_questions: i32,
    pub min_correct: i32,
    pub is_custom_quiz: bool,
    pub questions: Option<Vec<CreateQuestionRequest>>,
    pub categories: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct CreateQuizResponse {
    pub quiz_id: String,
    pub code_name: String,
    pub num_questions: i32,
    pub min_correct: i32,
    pub is_custom_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<i64>>,
}

/// Public quiz metadata plus its statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizInfo {
    pub quiz_id: String,
    pub code_name: String,
    pub num_questions: i32,
    pub min_correct: i32,
    pub is_custom_quiz: bool,
    pub categories: Option<Vec<i64>>,
    pub stats: Option<QuizStats>,
}

impl From<Quiz> for QuizInfo {
    fn from(quiz: Quiz) -> Self {
        Self {
            quiz_id: quiz.quiz_id,
            code_name: quiz.code_name,
            num_questions: quiz.num_questions,
            min_correct: quiz.min_correct,
            is_custom_quiz: quiz.is_custom_quiz,
            categories: quiz.categories,
            stats: quiz.stats,
        }
    }
}

/// A quiz ready to be taken: metadata and the administered questions.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizQuestions {
    pub quiz_id: String,
    pub code_name: String,
    pub num_questions: i32,
    pub min_correct: i32,
    pub is_custom_quiz: bool,
    pub categories: Option<Vec<i64>>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub answer_id: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub answers: Vec<SubmittedAnswer>,
}

/// Outcome of a graded attempt.
///
/// `code_value` can only be set through [`GradeResult::new`], which discloses
/// it for passing attempts alone. When withheld the field is omitted from the
/// JSON body entirely.
#[derive(Debug, Clone, Serialize)]
pub struct GradeResult {
    pub quiz_id: String,
    pub code_name: String,
    pub num_questions: i32,
    pub min_correct: i32,
    pub num_correct: i32,
    pub percent_correct: f64,
    pub is_passing: bool,
    pub score: f64,
    pub stats: StatsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_value: Option<String>,
}

/// Counts and score of one attempt, before the reward decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub num_questions: i32,
    pub min_correct: i32,
    pub num_correct: i32,
    pub percent_correct: f64,
    pub score: f64,
    pub is_passing: bool,
}

impl GradeResult {
    pub fn new(quiz: &Quiz, tally: Tally, stats: StatsSummary) -> Self {
        let code_value = if tally.is_passing && !quiz.code_value.is_empty() {
            Some(quiz.code_value.clone())
        } else {
            None
        };

        Self {
            quiz_id: quiz.quiz_id.clone(),
            code_name: quiz.code_name.clone(),
            num_questions: tally.num_questions,
            min_correct: tally.min_correct,
            num_correct: tally.num_correct,
            percent_correct: tally.percent_correct,
            is_passing: tally.is_passing,
            score: tally.score,
            stats,
            code_value,
        }
    }

    /// The disclosed reward, if the attempt passed.
    pub fn reward(&self) -> Option<&str> {
        self.code_value.as_deref()
    }
}
