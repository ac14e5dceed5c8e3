// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::ANSWER_CHOICE_COUNT,
    error::AppError,
    models::{
        question::{Question, check_answer_choices},
        quiz::{CreateQuizRequest, CreateQuizResponse, GradeRequest, Quiz, QuizInfo, QuizQuestions},
    },
    services::{grading, quiz_id, selector},
    store::DynQuizStore,
};

/// Checks the cross-field rules the derive cannot express.
fn validate_quiz_shape(req: &CreateQuizRequest) -> Result<(), AppError> {
    if req.min_correct < 0 || req.min_correct > req.num_questions {
        return Err(AppError::BadRequest(
            "min_correct must be between 0 and the number of questions".to_string(),
        ));
    }

    if req.is_custom_quiz {
        let questions = match &req.questions {
            Some(questions) if questions.len() == req.num_questions as usize => questions,
            _ => {
                return Err(AppError::BadRequest(
                    "Custom quiz must include the number of questions specified".to_string(),
                ));
            }
        };

        for question in questions {
            question.validate()?;
            check_answer_choices(
                &question.answer_choices,
                question.correct_id,
                ANSWER_CHOICE_COUNT,
            )
            .map_err(|problem| AppError::BadRequest(problem.message().to_string()))?;
        }
    } else if req.categories.is_none() {
        return Err(AppError::BadRequest(
            "categories array required when is_custom_quiz is false".to_string(),
        ));
    }

    Ok(())
}

/// Creates a quiz.
///
/// * Validates field ranges and, for custom quizzes, every authored question.
/// * Derives a unique identifier from `code_name`.
/// * Custom questions get sequential 1-based ids in the order given.
pub async fn create_quiz(
    State(store): State<DynQuizStore>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    req.validate()?;
    validate_quiz_shape(&req)?;

    let (questions, categories) = if req.is_custom_quiz {
        let questions = req
            .questions
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, q)| Question {
                question_id: index as i64 + 1,
                category_id: None,
                question: q.question,
                correct_id: q.correct_id,
                answer_choices: q.answer_choices,
            })
            .collect();
        (Some(questions), None)
    } else {
        (None, req.categories)
    };

    let draft = Quiz {
        quiz_id: String::new(),
        code_value: req.code_value,
        code_name: req.code_name.clone(),
        num_questions: req.num_questions,
        min_correct: req.min_correct,
        is_custom_quiz: req.is_custom_quiz,
        questions,
        categories,
        created_at: Utc::now(),
        stats: None,
    };

    let quiz = quiz_id::insert_with_unique_id(store.as_ref(), &req.code_name, draft).await?;

    tracing::info!(
        "Created {} quiz {} with {} questions",
        if quiz.is_custom_quiz { "custom" } else { "generated" },
        quiz.quiz_id,
        quiz.num_questions
    );

    let response = CreateQuizResponse {
        quiz_id: quiz.quiz_id,
        code_name: quiz.code_name,
        num_questions: quiz.num_questions,
        min_correct: quiz.min_correct,
        is_custom_quiz: quiz.is_custom_quiz,
        categories: quiz.categories,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn load_quiz(store: &DynQuizStore, quiz_id: &str) -> Result<Quiz, AppError> {
    store
        .find_quiz(quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

/// Returns public quiz metadata and statistics. Never includes the reward.
pub async fn get_quiz_info(
    State(store): State<DynQuizStore>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = load_quiz(&store, &quiz_id).await?;
    Ok(Json(QuizInfo::from(quiz)))
}

/// Returns the questions to administer, answer keys stripped and choices shuffled.
pub async fn get_quiz_questions(
    State(store): State<DynQuizStore>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = load_quiz(&store, &quiz_id).await?;
    let questions = selector::select_questions(store.as_ref(), &quiz).await?;

    Ok(Json(QuizQuestions {
        quiz_id: quiz.quiz_id,
        code_name: quiz.code_name,
        num_questions: quiz.num_questions,
        min_correct: quiz.min_correct,
        is_custom_quiz: quiz.is_custom_quiz,
        categories: quiz.categories,
        questions,
    }))
}

/// Grades a submission. The reward is only present in the body on a pass.
pub async fn grade_quiz(
    State(store): State<DynQuizStore>,
    Path(quiz_id): Path<String>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let result = grading::grade(store.as_ref(), &quiz_id, &req.answers).await?;
    Ok(Json(result))
}
