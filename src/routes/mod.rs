pub mod docs;
pub mod health;
pub mod quiz;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::AppState;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/create", get(quiz::create_form).post(quiz::create_quiz))
        .route("/quizzes", get(quiz::list_quizzes_page))
        .route("/quizlist", get(quiz::list_quizzes))
        .route("/quiz/:id", get(quiz::get_quiz).delete(quiz::delete_quiz))
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
