//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{ErrorResponse, SessionResponse, TurnRequest, TurnResponse};
use super::AppState;
use crate::render::highlight;
use crate::session::SessionError;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat page
        .route("/", get(serve_page))
        // Code highlighting classes, generated from the bundled theme
        .route("/highlight.css", get(highlight_css))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        // Turns
        .route("/api/turn", post(submit_turn))
        .route("/api/session", get(get_session))
        .route("/health", get(health))
        .with_state(state)
}

// ============================================================
// Page Handlers
// ============================================================

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn highlight_css() -> Result<Response, AppError> {
    let css = highlight::stylesheet().map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response())
}

// ============================================================
// Turns
// ============================================================

async fn submit_turn(
    State(state): State<AppState>,
    Json(req): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    // A turn already in flight holds the session for its whole duration
    let Ok(mut session) = state.session.try_lock() else {
        return Err(AppError::Conflict("A turn is already in progress".to_string()));
    };

    let report = session.submit(&req.message).await?;
    let response = TurnResponse::from(report);

    // Published while the session is still held, so snapshots stay in turn order
    state.snapshot.write().await.record(&response);
    Ok(Json(response))
}

/// Served from the snapshot so a reload during a turn answers immediately.
async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let input_enabled = state.gate.is_enabled();
    let snapshot = state.snapshot.read().await;

    Json(SessionResponse {
        stage: snapshot.stage,
        placeholder: snapshot.placeholder.clone(),
        input_enabled,
        locale: state.locale.tag().to_string(),
        failure_message: state.locale.failure_message().to_string(),
        turns: snapshot.turns.clone(),
    })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Conversation(e) => AppError::BadRequest(e.to_string()),
            SessionError::Busy => AppError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
