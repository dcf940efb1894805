//! HTTP routes and handlers

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info};

use crate::orchestrator;
use crate::state::AppState;

/// Session used when the caller supplies no session id
const DEFAULT_SESSION: &str = "default";

pub fn create_router(state: AppState) -> Router {
    // CORS defaults to local origins; override only for explicit deployments.
    let allow_any_origin = std::env::var("MINDHAVEN_ALLOW_ANY_ORIGIN")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let cors = if allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ]))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/chat", post(chat))
        .fallback(fallback)
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Chat triage request
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The message to triage
    pub message: String,

    /// Conversation key; omitted means the shared default session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Chat triage response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// One of the five mental-state labels
    pub label: String,

    /// Confidence in [0, 100], rounded to 2 decimals
    pub confidence: f64,

    /// Supportive reply text
    pub reply: String,
}

/// Main chat triage handler
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let request_id = uuid::Uuid::new_v4();
    let session_id = req.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    info!("Received chat request {} for session {}", request_id, session_id);
    metrics::counter!("mindhaven_requests_total").increment(1);

    let outcome = orchestrator::handle_message(&state, session_id, &req.message).await?;

    Ok(Json(ChatResponse {
        label: outcome.state.to_string(),
        confidence: outcome.confidence,
        reply: outcome.reply,
    }))
}

async fn fallback() -> &'static str {
    "Not found"
}

/// Error handling
#[derive(Debug)]
pub struct AppError(mindhaven_core::Error);

impl From<mindhaven_core::Error> for AppError {
    fn from(err: mindhaven_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use mindhaven_core::Error;

        let (status, kind) = match &self.0 {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            Error::Classifier(_) => (StatusCode::INTERNAL_SERVER_ERROR, "classifier_error"),
            Error::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = json!({
            "error": {
                "message": self.0.to_string(),
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
