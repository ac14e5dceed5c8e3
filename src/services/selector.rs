// src/services/selector.rs

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::AppError,
    models::{
        question::{PublicQuestion, Question},
        quiz::Quiz,
    },
    store::QuizStore,
    utils::shuffle::fisher_yates,
};

/// Retrieves the questions to administer for `quiz`.
///
/// Custom quizzes return their authored list in order; generated quizzes draw
/// a fresh random sample from the bank. Either way the quiz must be filled
/// completely, and answer choices are reshuffled on every call.
pub async fn select_questions(
    store: &dyn QuizStore,
    quiz: &Quiz,
) -> Result<Vec<PublicQuestion>, AppError> {
    let wanted = usize::try_from(quiz.num_questions).unwrap_or(0);

    let questions = if quiz.is_custom_quiz {
        quiz.questions.clone().unwrap_or_default()
    } else {
        let categories = quiz.categories.as_deref().unwrap_or(&[]);
        store.sample_bank_questions(categories, wanted).await?
    };

    if questions.len() < wanted {
        tracing::warn!(
            "Quiz {} needs {} questions but only {} are available",
            quiz.quiz_id,
            wanted,
            questions.len()
        );
        return Err(AppError::InsufficientQuestions(
            "Not enough questions available".to_string(),
        ));
    }

    let mut rng = StdRng::from_entropy();
    Ok(present(questions, &mut rng))
}

/// Strips the answer key and shuffles each question's choices independently.
pub fn present<R: Rng + ?Sized>(questions: Vec<Question>, rng: &mut R) -> Vec<PublicQuestion> {
    questions
        .into_iter()
        .map(|question| {
            let mut public = PublicQuestion::from(question);
            fisher_yates(&mut public.answer_choices, &mut *rng);
            public
        })
        .collect()
}
