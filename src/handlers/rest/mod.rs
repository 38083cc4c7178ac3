use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_macros::debug_handler;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, CreateNoteResponse, ErrorResponse, NoteResponse, SummaryResponse},
    service::{NoteService, ServiceError},
};

pub const SUMMARY_FAILED: &str = "LLM summarization failed.";

#[derive(OpenApi)]
#[openapi(
    paths(create_note, get_all_notes, summarize_today),
    components(schemas(
        CreateNoteRequest,
        CreateNoteResponse,
        NoteResponse,
        SummaryResponse,
        ErrorResponse
    )),
    tags(
        (name = "journal", description = "Journal notes and daily summaries")
    )
)]
pub struct ApiDoc;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/message", post(create_note))
        .route("/messages", get(get_all_notes))
        .route("/summary/today", get(summarize_today))
        .route("/api-doc/openapi.json", get(openapi))
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Journal server is running").into_response()
}

async fn openapi() -> Response {
    Json(ApiDoc::openapi()).into_response()
}

#[utoipa::path(
    post,
    path = "/message",
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note stored", body = CreateNoteResponse),
        (status = 400, description = "Missing or blank content", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "journal"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(ServiceError::EmptyContent) => {
            tracing::warn!("rejected note with missing or blank content");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(ServiceError::EmptyContent.to_string())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("failed to create note entry: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to store note")),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "All notes, most recent first", body = Vec<NoteResponse>)
    ),
    tag = "journal"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    (StatusCode::OK, Json(service.get_all_notes().await)).into_response()
}

#[utoipa::path(
    get,
    path = "/summary/today",
    responses(
        (status = 200, description = "Summary of today's notes", body = SummaryResponse),
        (status = 500, description = "Summarization or storage failure", body = ErrorResponse)
    ),
    tag = "journal"
)]
#[debug_handler]
pub async fn summarize_today(State(service): State<Arc<NoteService>>) -> Response {
    match service.summarize_today().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(ServiceError::Summarization(e)) => {
            tracing::error!("LLM summarization failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(SUMMARY_FAILED)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("failed to load today's notes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
