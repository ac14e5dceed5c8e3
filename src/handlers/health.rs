// src/handlers/health.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::{error::AppError, store::DynQuizStore};

/// Liveness probe that also checks the store is reachable.
pub async fn health_check(
    State(store): State<DynQuizStore>,
) -> Result<impl IntoResponse, AppError> {
    store
        .ping()
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("store ping failed: {}", e.message())))?;

    Ok(Json(json!({
        "status": "ok",
        "database": "connected",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}
