// src/handlers/category.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, store::DynQuizStore};

/// Lists all question-bank categories, ordered by name.
pub async fn list_categories(
    State(store): State<DynQuizStore>,
) -> Result<impl IntoResponse, AppError> {
    let categories = store.list_categories().await?;
    Ok(Json(categories))
}
