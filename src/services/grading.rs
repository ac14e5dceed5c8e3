// src/services/grading.rs

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        question::Question,
        quiz::{GradeResult, Quiz, SubmittedAnswer, Tally},
        stats::AttemptRecord,
    },
    store::QuizStore,
    utils::rounding::round2,
};

/// Maps question id to correct answer id. Later duplicates win.
pub fn build_answer_key(questions: &[Question]) -> HashMap<i64, i64> {
    questions
        .iter()
        .map(|q| (q.question_id, q.correct_id))
        .collect()
}

/// Counts submitted answers that match the key.
///
/// Question ids missing from the key are ignored. A question answered more
/// than once is judged by its first answer only.
pub fn count_correct(answers: &[SubmittedAnswer], key: &HashMap<i64, i64>) -> i32 {
    let mut judged = HashSet::new();
    let mut correct = 0;

    for answer in answers {
        let Some(correct_id) = key.get(&answer.question_id) else {
            continue;
        };
        if !judged.insert(answer.question_id) {
            continue;
        }
        if answer.answer_id == *correct_id {
            correct += 1;
        }
    }

    correct
}

/// Percentage of correct answers in `[0, 100]`; zero when there are no questions.
pub fn percent_correct(num_correct: i32, num_questions: i32) -> f64 {
    if num_questions <= 0 {
        return 0.0;
    }
    (100.0 * f64::from(num_correct) / f64::from(num_questions)).clamp(0.0, 100.0)
}

/// Scores a submission against an answer key using the quiz's configuration.
pub fn tally(quiz: &Quiz, answers: &[SubmittedAnswer], key: &HashMap<i64, i64>) -> Tally {
    let num_correct = count_correct(answers, key);

    let num_questions = if quiz.num_questions > 0 {
        quiz.num_questions
    } else {
        i32::try_from(key.len()).unwrap_or(i32::MAX)
    };
    let min_correct = quiz.min_correct.max(0);

    let percent_correct = percent_correct(num_correct, num_questions);

    Tally {
        num_questions,
        min_correct,
        num_correct,
        percent_correct,
        score: round2(percent_correct),
        is_passing: num_correct >= min_correct,
    }
}

/// Grades a submission for `quiz_id` and records the attempt.
pub async fn grade(
    store: &dyn QuizStore,
    quiz_id: &str,
    answers: &[SubmittedAnswer],
) -> Result<GradeResult, AppError> {
    if answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let quiz = store
        .find_quiz(quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let key_questions = if quiz.is_custom_quiz {
        quiz.questions.clone().unwrap_or_default()
    } else {
        // Only the questions that were actually asked.
        let mut ids: Vec<i64> = answers.iter().map(|a| a.question_id).collect();
        ids.sort_unstable();
        ids.dedup();
        store.bank_questions_by_ids(&ids).await?
    };

    if key_questions.is_empty() {
        return Err(AppError::NotFound(
            "Quiz does not have questions available for grading".to_string(),
        ));
    }

    let key = build_answer_key(&key_questions);
    let tally = tally(&quiz, answers, &key);

    let attempt = AttemptRecord {
        score: tally.score,
        timestamp: Utc::now(),
        passed: tally.is_passing,
    };

    let stats = store
        .record_attempt(&quiz.quiz_id, attempt)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    tracing::info!(
        "Graded quiz {}: {}/{} correct, score {}, passed: {}",
        quiz.quiz_id,
        tally.num_correct,
        tally.num_questions,
        tally.score,
        tally.is_passing
    );

    Ok(GradeResult::new(&quiz, tally, stats.summary()))
}
