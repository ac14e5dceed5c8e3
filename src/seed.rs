// src/seed.rs

//! Optional question-bank seeding at startup.

use serde::Deserialize;

use crate::{
    error::AppError,
    models::question::{AnswerChoice, NewBankQuestion},
    store::QuizStore,
};

#[derive(Debug, Deserialize)]
pub struct BankSeed {
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub category_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionSeed>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionSeed {
    pub question: String,
    pub correct_id: i64,
    pub answer_choices: Vec<AnswerChoice>,
}

/// Summary of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub categories_skipped: usize,
    pub questions_created: usize,
}

pub fn parse_seed(raw: &str) -> Result<BankSeed, AppError> {
    Ok(serde_json::from_str(raw)?)
}

/// Inserts every category of `seed` that is not present yet, with its questions.
/// Existing categories are left untouched, so seeding twice is harmless.
pub async fn apply_seed(store: &dyn QuizStore, seed: BankSeed) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();

    for category in seed.categories {
        if store
            .find_category_by_name(&category.category_name)
            .await?
            .is_some()
        {
            tracing::debug!("Category '{}' already seeded", category.category_name);
            report.categories_skipped += 1;
            continue;
        }

        let created = store
            .insert_category(&category.category_name, category.description.as_deref())
            .await?;
        report.categories_created += 1;

        for question in category.questions {
            store
                .insert_bank_question(NewBankQuestion {
                    category_id: created.category_id,
                    question: question.question,
                    correct_id: question.correct_id,
                    answer_choices: question.answer_choices,
                })
                .await?;
            report.questions_created += 1;
        }
    }

    Ok(report)
}

/// Reads and applies the seed file at `path`.
pub async fn seed_from_file(store: &dyn QuizStore, path: &str) -> Result<SeedReport, AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::InternalServerError(format!("cannot read {}: {}", path, e)))?;
    apply_seed(store, parse_seed(&raw)?).await
}
