// src/services/quiz_id.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::{error::AppError, models::quiz::Quiz, store::QuizStore};

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

/// Normalizes a label into the base of a quiz identifier.
///
/// Lowercases, drops everything except ASCII word characters, whitespace and
/// hyphens, turns whitespace runs into a hyphen and collapses repeated hyphens.
/// "Hello World!" becomes "hello-world".
pub fn slugify(label: &str) -> String {
    let lowered = label.to_lowercase();
    let stripped = DISALLOWED.replace_all(lowered.trim(), "");
    let dashed = WHITESPACE.replace_all(&stripped, "-");
    DASHES.replace_all(&dashed, "-").into_owned()
}

/// The `n`-th candidate for `base`: the base itself, then `base-1`, `base-2`, ...
fn candidate(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, n)
    }
}

/// Probes candidates starting at suffix `from` and returns the first unused
/// one with its suffix. An empty base is never returned bare.
async fn first_free(
    store: &dyn QuizStore,
    base: &str,
    from: u32,
) -> Result<(String, u32), AppError> {
    let mut n = if base.is_empty() { from.max(1) } else { from };
    loop {
        let id = candidate(base, n);
        if !store.quiz_id_exists(&id).await? {
            return Ok((id, n));
        }
        n += 1;
    }
}

/// Derives an identifier for `label` that is not yet present in the store.
pub async fn generate(store: &dyn QuizStore, label: &str) -> Result<String, AppError> {
    let (id, _) = first_free(store, &slugify(label), 0).await?;
    Ok(id)
}

/// Stores `quiz` under the first free identifier derived from `label`.
///
/// The existence probe and the insert are separate round-trips, so the insert
/// is conditional: if another request claimed the id in between, probing
/// resumes at the next suffix.
pub async fn insert_with_unique_id(
    store: &dyn QuizStore,
    label: &str,
    mut quiz: Quiz,
) -> Result<Quiz, AppError> {
    let base = slugify(label);
    let mut from = 0;

    loop {
        let (id, n) = first_free(store, &base, from).await?;
        quiz.quiz_id = id;

        if store.insert_quiz(&quiz).await? {
            return Ok(quiz);
        }

        tracing::warn!("Quiz id '{}' was claimed concurrently, probing on", quiz.quiz_id);
        from = n + 1;
    }
}
