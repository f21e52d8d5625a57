use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::dto::quiz_dto::{CreateQuestion, CreateQuizPayload};
use crate::models::quiz::{Question, Quiz, QuizSummary};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::quiz::create_form,
        crate::routes::quiz::create_quiz,
        crate::routes::quiz::list_quizzes_page,
        crate::routes::quiz::list_quizzes,
        crate::routes::quiz::get_quiz,
        crate::routes::quiz::delete_quiz,
    ),
    components(schemas(Quiz, Question, QuizSummary, CreateQuizPayload, CreateQuestion)),
    tags((name = "quizzes", description = "Quiz documents"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
