// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::MAX_ANSWER_LENGTH;

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerChoice {
    pub answer_id: i64,
    pub answer_value: String,
}

/// A question together with its answer key.
///
/// Custom quizzes embed these in the quiz document (`category_id` is `None`);
/// generated quizzes draw them from the shared question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    /// Prompt text.
    pub question: String,

    pub correct_id: i64,

    pub answer_choices: Vec<AnswerChoice>,
}

/// DTO for sending a question to the quiz-taker (excludes the answer key).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub question_id: i64,
    pub question: String,
    pub answer_choices: Vec<AnswerChoice>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            question_id: q.question_id,
            question: q.question,
            answer_choices: q.answer_choices,
        }
    }
}

/// DTO for an inline question of a custom quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 300, message = "Question text must be between 1 and 300 characters."))]
    pub question: String,
    pub correct_id: i64,
    pub answer_choices: Vec<AnswerChoice>,
}

/// A bank question awaiting insertion (seed loader).
#[derive(Debug, Clone, Deserialize)]
pub struct NewBankQuestion {
    pub category_id: i64,
    pub question: String,
    pub correct_id: i64,
    pub answer_choices: Vec<AnswerChoice>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ChoiceProblem {
    WrongCount,
    InvalidChoice,
    DuplicateIds,
    MissingCorrectId,
    DuplicateValues,
}

impl ChoiceProblem {
    pub fn message(&self) -> &'static str {
        match self {
            ChoiceProblem::WrongCount => "Each question must have exactly 4 answer choices",
            ChoiceProblem::InvalidChoice => "Invalid answer choice format or length",
            ChoiceProblem::DuplicateIds => "Answer IDs must be unique (0-3)",
            ChoiceProblem::MissingCorrectId => "Answer IDs must include correct_id",
            ChoiceProblem::DuplicateValues => "answer_value must be unique per question",
        }
    }
}

/// Checks the answer choices of an authored question.
///
/// Exactly four choices, ids drawn from 0..=3 without repeats, the correct id
/// among them, and distinct non-empty texts of at most 150 characters.
pub fn check_answer_choices(
    choices: &[AnswerChoice],
    correct_id: i64,
    expected: usize,
) -> Result<(), ChoiceProblem> {
    if choices.len() != expected {
        return Err(ChoiceProblem::WrongCount);
    }

    let mut ids = std::collections::HashSet::new();
    let mut values = std::collections::HashSet::new();

    for choice in choices {
        let len = choice.answer_value.chars().count();
        if len == 0 || len > MAX_ANSWER_LENGTH {
            return Err(ChoiceProblem::InvalidChoice);
        }
        if !(0..expected as i64).contains(&choice.answer_id) {
            return Err(ChoiceProblem::DuplicateIds);
        }
        ids.insert(choice.answer_id);
        values.insert(choice.answer_value.as_str());
    }

    if ids.len() != expected {
        return Err(ChoiceProblem::DuplicateIds);
    }
    if !ids.contains(&correct_id) {
        return Err(ChoiceProblem::MissingCorrectId);
    }
    if values.len() != expected {
        return Err(ChoiceProblem::DuplicateValues);
    }

    Ok(())
}
