//! `POST /v1/agent/message`: one agent turn plus its audit span.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use mc_domain::contract::AgentResponse;
use mc_domain::error::Result;
use mc_domain::tool::Message;
use serde::Deserialize;

use super::extract::ActionJson;
use super::{anthropic_key, bearer_token, failure, ActionResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
    #[serde(default, alias = "conversationHistory")]
    pub history: Vec<Message>,
    #[serde(default)]
    pub model: Option<String>,
}

pub async fn process_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    ActionJson(body): ActionJson<MessageBody>,
) -> Response {
    match run_turn(&state, &headers, &body).await {
        Ok(resp) => match serde_json::to_value(&resp) {
            Ok(data) => ActionResult::ok(Some(data)).into_response(),
            Err(e) => failure("process_message", e.into()),
        },
        Err(e) => failure("process_message", e),
    }
}

async fn run_turn(state: &AppState, headers: &HeaderMap, body: &MessageBody) -> Result<AgentResponse> {
    let gateway = state.gateway_for(bearer_token(headers));
    let llm_key = anthropic_key(headers);

    let resp = state
        .dispatcher_for(&gateway)
        .process_message(
            &body.message,
            &body.history,
            body.model.as_deref(),
            llm_key.as_deref(),
        )
        .await?;

    if state.config.agent.record_interactions && gateway.credential().is_some() {
        gateway.record_interaction(&body.message, &resp).await?;
    } else {
        tracing::debug!("interaction audit skipped");
    }

    Ok(resp)
}
