//! HTTP request handlers

use super::types::{
    CategoriesResponse, CategoryInfo, ChatRequest, ChatResponse, ErrorResponse,
    SessionChatRequest, SessionChatResponse, SuccessResponse,
};
use super::AppState;
use crate::catalog::{display_category, CatalogStore};
use crate::runtime::{SessionBlob, SessionStore};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

const MAX_SESSION_ID_LEN: usize = 128;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Client-carried session blob
        .route("/chat", post(chat))
        // Server-held sessions
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/chat", post(session_chat))
        .route("/api/categories", get(list_categories))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Client-carried blobs are checked while deserializing; surface that as 400
    let Json(req) = payload.map_err(|e| {
        tracing::warn!(error = %e.body_text(), "Rejected chat request");
        AppError::BadRequest(e.body_text())
    })?;

    let blob = req.session_data.unwrap_or_default();
    let out = state.engine.handle_turn(&req.message, blob);
    tracing::info!(step = %out.blob.dialogue.step, "Chat turn");

    Ok(Json(ChatResponse {
        response: out.reply,
        session_data: out.blob,
    }))
}

async fn session_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SessionChatRequest>,
) -> Result<Json<SessionChatResponse>, AppError> {
    validate_session_id(&id)?;

    let handle = state.sessions.get_or_create(&id).await;
    // Held for the whole turn so turns on one session never interleave
    let mut blob = handle.lock().await;
    let out = state
        .engine
        .handle_turn(&req.message, std::mem::take(&mut *blob));
    *blob = out.blob;

    let step = blob.dialogue.step;
    tracing::info!(session_id = %id, step = %step, "Chat turn");

    Ok(Json(SessionChatResponse {
        response: out.reply,
        step,
    }))
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionBlob>, AppError> {
    validate_session_id(&id)?;
    let handle = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))?;
    let blob = handle.lock().await.clone();
    Ok(Json(blob))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    validate_session_id(&id)?;
    if !state.sessions.remove(&id).await {
        return Err(AppError::NotFound(format!("Session not found: {id}")));
    }
    let remaining = state.sessions.session_count().await;
    tracing::info!(session_id = %id, remaining, "Session removed");
    Ok(Json(SuccessResponse { success: true }))
}

fn validate_session_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid session id: {id}")))
    }
}

// ============================================================
// Catalog
// ============================================================

async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let categories = state
        .engine
        .catalog()
        .categories()
        .iter()
        .map(|id| CategoryInfo {
            id: id.clone(),
            name: display_category(id),
        })
        .collect();
    Json(CategoriesResponse { categories })
}

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
