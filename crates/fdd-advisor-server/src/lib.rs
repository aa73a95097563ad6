//! fdd-advisor-server library - HTTP surface for the answer engine.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fdd_advisor::{AnswerEngine, ChatRequest, GateError, SearchRequest};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnswerEngine>,
}

impl AppState {
    pub fn new(engine: Arc<AnswerEngine>) -> Self {
        Self { engine }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/fdd/:fdd_id/search", post(search))
        .route("/api/fdd-chat", post(chat))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "fdd-advisor-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/fdd/:fdd_id/search - semantic search over an indexed document
async fn search(
    State(state): State<AppState>,
    Path(fdd_id): Path<String>,
    Json(req): Json<SearchRequest>,
) -> Response {
    match state.engine.answer(&fdd_id, req).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/fdd-chat - full-text analyst over caller-supplied document text
async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    match state.engine.analyze(req).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

/// Map the gate's error taxonomy onto HTTP statuses. Upstream detail is
/// logged server-side; the client only ever sees a short, human-readable
/// message.
pub fn error_response(error: GateError) -> Response {
    let (status, message) = match &error {
        GateError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        GateError::MissingCredential(what) => {
            tracing::error!(capability = %what, "request needs unconfigured capability");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{} not configured", what))
        }
        GateError::Upstream { service, status, .. } => {
            tracing::error!(error = %error, service = %service, "upstream service failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("AI service error ({}). Please try again.", status),
            )
        }
        GateError::Internal(_) => {
            tracing::error!(error = %error, "unhandled internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate response: {}", error),
            )
        }
    };

    (status, Json(json!({ "error": message }))).into_response()
}
