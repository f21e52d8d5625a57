use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};

use crate::{
    dto::quiz_dto::CreateQuizPayload,
    error::{Error, Result},
    models::quiz::QuizSummary,
    render, AppState,
};

#[utoipa::path(
    get,
    path = "/create",
    responses(
        (status = 200, description = "Quiz creation form"),
        (status = 500, description = "Form could not be loaded")
    )
)]
#[axum::debug_handler]
pub async fn create_form(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let path = state.static_dir.join("index.html");
    let page = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to load creation form");
        Error::Internal("Could not load template".to_string())
    })?;
    Ok(Html(page))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body(content = CreateQuizPayload, content_type = "application/yaml"),
    responses(
        (status = 200, description = "Quiz saved", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed quiz document"),
        (status = 500, description = "Storage failure")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.create(&body).await?;
    Ok((
        StatusCode::OK,
        [(header::LOCATION, format!("/quiz/{}", quiz.id))],
        "Quiz saved successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/quizzes",
    responses(
        (status = 200, description = "HTML page listing saved quizzes"),
        (status = 500, description = "Storage or template failure")
    )
)]
#[axum::debug_handler]
pub async fn list_quizzes_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summaries = state.quiz_service.list().await?;
    let page = render::quiz_list_page(&summaries)?;
    Ok(Html(page))
}

#[utoipa::path(
    get,
    path = "/quizlist",
    responses(
        (status = 200, description = "Saved quizzes", body = [QuizSummary]),
        (status = 500, description = "Storage failure")
    )
)]
#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summaries = state.quiz_service.list().await?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/quiz/{id}",
    params(
        ("id" = String, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Quiz document as YAML", body = String, content_type = "text/plain"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.get(&id).await?;
    let document = render::quiz_document(&quiz)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        document,
    ))
}

#[utoipa::path(
    delete,
    path = "/quiz/{id}",
    params(
        ("id" = String, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Quiz deleted", body = String, content_type = "text/plain"),
        (status = 404, description = "Quiz not found"),
        (status = 500, description = "Storage failure")
    )
)]
#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete(&id).await?;
    Ok((StatusCode::OK, "Quiz deleted successfully"))
}
