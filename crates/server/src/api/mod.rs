pub mod agent;
pub mod auth;
pub mod conversations;
pub mod extract;
pub mod folders;
pub mod health;
pub mod messages;
pub mod workspace;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use mc_domain::error::Error;
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Agent
        .route("/v1/agent/message", post(agent::process_message))
        // Conversations
        .route(
            "/v1/conversations",
            get(conversations::list).post(conversations::create),
        )
        .route("/v1/conversations/search", get(conversations::search))
        .route(
            "/v1/conversations/:id",
            patch(conversations::update).delete(conversations::delete),
        )
        .route("/v1/conversations/:id/messages", get(messages::list))
        // Messages
        .route("/v1/messages", post(messages::send))
        // Folders
        .route("/v1/folders", get(folders::list).post(folders::create))
        .route(
            "/v1/folders/:id",
            patch(folders::update).delete(folders::delete),
        )
        // Workspace
        .route("/v1/workspace", get(workspace::load))
        // Auth helpers (no LogLine credential needed)
        .route("/v1/auth/magic-link", post(auth::magic_link))
        .route("/v1/auth/verify", get(auth::verify))
        .route("/v1/onboarding", post(auth::onboarding))
        .with_state(state)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response envelope
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The uniform action answer.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(rename = "spanId", skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            span_id: None,
            error: None,
        }
    }

    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Turn a failed action into `{success: false, error}` with a fitting status.
pub(crate) fn failure(action: &str, e: Error) -> Response {
    let status = match &e {
        Error::Unauthenticated | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::InvalidSpan(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
        Error::Remote { .. } | Error::Provider { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(action, error = %e, status = status.as_u16(), "action failed");
    (
        status,
        Json(ActionResult {
            success: false,
            data: None,
            span_id: None,
            error: Some(e.to_string()),
        }),
    )
        .into_response()
}

/// Serialize a successful payload, or fail the action.
pub(crate) fn respond<T: Serialize>(action: &str, result: mc_domain::error::Result<T>) -> Response {
    match result.and_then(|v| serde_json::to_value(v).map_err(Error::from)) {
        Ok(data) => ActionResult::ok(Some(data)).into_response(),
        Err(e) => failure(action, e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Caller credentials
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) const ANTHROPIC_KEY_HEADER: &str = "x-anthropic-key";

/// `Authorization: Bearer <token>` from the caller, if present.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Per-request LLM key override.
pub(crate) fn anthropic_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ANTHROPIC_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
}
