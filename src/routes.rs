// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{category, health, quiz},
    state::AppState,
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Assembles the main application router.
///
/// * Quiz lifecycle: create, info, questions, grade.
/// * Question-bank categories and the liveness probe.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let quiz_routes = Router::new()
        .route("/quizzes", post(quiz::create_quiz))
        .route("/quizzes/{quiz_id}/info", get(quiz::get_quiz_info))
        .route("/quizzes/{quiz_id}/questions", get(quiz::get_quiz_questions))
        .route("/quizzes/{quiz_id}/grade", post(quiz::grade_quiz));

    Router::new()
        .route("/", get(health::health_check))
        .route("/categories", get(category::list_categories))
        .merge(quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
