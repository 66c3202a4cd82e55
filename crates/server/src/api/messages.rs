use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::extract::{ActionJson, ActionQuery};
use super::{bearer_token, failure, respond, ActionResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(conversation_id): Path<String>,
    ActionQuery(params): ActionQuery<ListParams>,
) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .get_messages(&conversation_id, params.limit)
        .await
        .map(|resp| resp.result);
    respond("get_messages", result)
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

pub async fn send(
    State(state): State<AppState>,
    headers: HeaderMap,
    ActionJson(body): ActionJson<SendBody>,
) -> Response {
    let model = body
        .model
        .as_deref()
        .unwrap_or(state.config.llm.default_model.as_str());
    match state
        .gateway_for(bearer_token(&headers))
        .send_message(&body.message, body.conversation_id.as_deref(), model)
        .await
    {
        Ok(resp) => ActionResult::ok(resp.result)
            .with_span_id(resp.span_id)
            .into_response(),
        Err(e) => failure("send_message", e),
    }
}
